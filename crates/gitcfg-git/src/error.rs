//! Error types for gitcfg-git

use std::time::Duration;

use gitcfg_core::StoreError;

/// Result type for gitcfg-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to git
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("`{command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unexpected git config output: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Timeout { command, after } => StoreError::Timeout { command, after },
            Error::Spawn { command, source } => StoreError::Spawn { command, source },
            Error::CommandFailed { code, stderr, .. } => StoreError::CommandFailed { code, stderr },
            Error::Parse { message } => StoreError::Parse { message },
            Error::Git(e) => StoreError::CommandFailed {
                code: None,
                stderr: e.message().to_string(),
            },
            Error::Io(source) => StoreError::Spawn {
                command: "git".to_string(),
                source,
            },
        }
    }
}
