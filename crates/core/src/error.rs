//! Unified error types for newsfax.
//!
//! Each variant's display string starts with the stable code returned to clients.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the newsfax service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL could not be turned into a fact-check key.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The backing store could not be reached or written.
    #[error("STORE_UNAVAILABLE: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_UNAVAILABLE: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row does not decode into a valid job record.
    #[error("CORRUPT_RECORD: {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// A claim was refused but no record could be read back.
    #[error("MISSING_RECORD: {0}")]
    MissingRecord(String),

    /// Fact list could not be encoded for storage.
    #[error("ENCODE_FAILED: {0}")]
    Encode(String),

    /// The fact-check computation failed.
    #[error("CHECK_FAILED: {0}")]
    CheckFailed(String),

    /// The fact-check computation exceeded its time budget.
    #[error("CHECK_TIMEOUT: no result after {0}ms")]
    CheckTimeout(u64),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidUrl(msg) => (-32602, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::CorruptRecord { .. } => (-32003, err.to_string()),
            Error::MissingRecord(key) => (-32003, format!("no record for {key}")),
            Error::Encode(msg) => (-32003, msg.clone()),
            Error::CheckFailed(msg) => (-32000, msg.clone()),
            Error::CheckTimeout(_) => (-32000, err.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
