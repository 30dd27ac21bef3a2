//! Error types for gitcfg-core

use std::path::PathBuf;
use std::time::Duration;

use crate::scope::Scope;

/// Result type for gitcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitcfg-core operations
///
/// Each variant is one case of the engine's error taxonomy so callers can
/// pick exit codes and wording per case instead of matching on messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A key failed the syntactic format check
    #[error("Malformed configuration key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    /// Static category/bundle definitions are inconsistent
    #[error("Category definitions are inconsistent: {0}")]
    CategoryLoadConflict(#[from] CategoryLoadError),

    /// Requested category id does not exist in the registry
    #[error("Unknown category id '{id}'")]
    CategoryNotFound { id: String },

    /// The raw-store reader or writer failed
    #[error("Configuration store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Mutation targets a scope whose store is read-only
    #[error("Scope '{scope}' is read-only in the current environment")]
    ScopeNotWritable { scope: Scope },

    /// Mutation targets a scope with no known store location
    #[error("Scope '{scope}' is not available in this context")]
    ScopeUnavailable { scope: Scope },

    /// Unset requested for a key that has no entry at the scope
    #[error("Key '{key}' is not set at {scope} scope")]
    KeyNotFoundAtScope { key: String, scope: Scope },

    /// Assembled snapshot violates its own invariants
    #[error("Internal consistency failure: {message}")]
    InternalConsistency { message: String },

    /// A scope identifier could not be parsed
    #[error("Unsupported scope '{value}' (expected system, global or local)")]
    InvalidScope { value: String },

    /// The settings file could not be loaded
    #[error("Invalid settings at {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalConsistency {
            message: message.into(),
        }
    }
}

/// Reasons a category registry refuses to load
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryLoadError {
    #[error("category id '{id}' is declared more than once")]
    DuplicateCategory { id: String },

    #[error("category id '{id}' is reserved")]
    ReservedCategory { id: String },

    #[error("category id must not be empty")]
    EmptyCategoryId,

    #[error("bundle id '{id}' is declared more than once")]
    DuplicateBundle { id: String },

    #[error("bundle '{bundle}' references unknown category '{category}'")]
    UnknownBundleCategory { bundle: String, category: String },

    #[error("key '{key}' is claimed by both '{first}' and '{second}'")]
    AmbiguousKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("pattern '{pattern}' in category '{category}' must have the form '<section>.*'")]
    InvalidPattern { category: String, pattern: String },
}

/// Failures reported by a raw-store collaborator
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store command did not finish in time
    #[error("store command timed out after {after:?}: {command}")]
    Timeout { command: String, after: Duration },

    /// The store command could not be started
    #[error("failed to start store command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The store command exited unsuccessfully; `stderr` is verbatim
    #[error("store command failed (exit code {}): {stderr}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed { code: Option<i32>, stderr: String },

    /// The store produced output that could not be understood
    #[error("unexpected store output: {message}")]
    Parse { message: String },
}

impl StoreError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
