use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The database answered but refused the request (constraint, bad column, ...).
    #[error("{message}")]
    Rejected { table: String, message: String },
    /// A row came back in a shape the typed projection does not accept.
    #[error("failed to decode `{table}` row")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a rejection carrying the database's own message.
    pub fn rejected(table: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Rejected {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Construct a decode failure for rows of `table`.
    pub fn decode(table: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Decode {
            table: table.into(),
            source,
        }
    }
}
