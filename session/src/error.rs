//! Session error types.

use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The plan could not be built; nothing was written.
    #[error("build error: {0}")]
    Build(#[from] mend_planner::BuildError),

    /// The plan failed during execution.
    #[error("transaction error: {0}")]
    Transaction(#[from] mend_transaction::TransactionError),

    /// Configuration could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging { message: String },
}

impl SessionError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
