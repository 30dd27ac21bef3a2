//! git-backed configuration store for gitcfg
//!
//! Implements [`gitcfg_core::ConfigStore`] on top of the `git` executable:
//!
//! - [`runner`]: bounded `git` invocations with environment overrides
//! - [`parse`]: parser for the null-delimited `git config --list` output
//! - [`store`]: scope discovery, writability probing and writes

pub mod error;
pub mod parse;
pub mod runner;
pub mod store;

pub use error::{Error, Result};
pub use parse::parse_config_list;
pub use runner::{DEFAULT_TIMEOUT, GitRunner};
pub use store::GitStore;
