//! Shared test utilities for the gitcfg workspace.
//!
//! This crate provides an isolated git environment so tests never read or
//! write the developer's real configuration. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`sandbox`]: [`GitSandbox`] with private system, global and local files

pub mod sandbox;

pub use sandbox::GitSandbox;
