//! Error types for gitcfg-cli

use gitcfg_core::Error as CoreError;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from gitcfg-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialised
    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        let Self::Core(err) = self else {
            return 1;
        };
        match err {
            CoreError::StoreUnavailable(_) => 2,
            CoreError::CategoryNotFound { .. } => 3,
            CoreError::ScopeNotWritable { .. } | CoreError::ScopeUnavailable { .. } => 4,
            CoreError::KeyNotFoundAtScope { .. } => 5,
            CoreError::MalformedKey { .. } => 6,
            CoreError::Settings { .. } | CoreError::CategoryLoadConflict(_) => 7,
            CoreError::InternalConsistency { .. } => 70,
            _ => 1,
        }
    }

    /// Short heading shown before the message.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Core(CoreError::StoreUnavailable(_)) => "git error",
            Self::Core(CoreError::CategoryNotFound { .. }) => "unknown category",
            Self::Core(CoreError::ScopeUnavailable { .. }) => "scope unavailable",
            Self::Core(CoreError::ScopeNotWritable { .. }) => "scope not writable",
            Self::Core(CoreError::Settings { .. } | CoreError::CategoryLoadConflict(_)) => {
                "configuration error"
            }
            _ => "error",
        }
    }
}
