//! Fixture error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document path in fixture {name}: {source}")]
    InvalidRef {
        name: String,
        #[source]
        source: mend_core::StoreError,
    },
}

pub type FixtureResult<T> = Result<T, FixtureError>;
