//! Error types for the Naginata library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`NaginataError`] enum. The taxonomy distinguishes caller mistakes
//! (invalid queries, invalid configuration) from failures of the underlying
//! retrieval capabilities, so callers can decide what is retryable.
//!
//! # Examples
//!
//! ```
//! use naginata::error::{NaginataError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NaginataError::invalid_query("Query text must not be empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Naginata operations.
#[derive(Error, Debug)]
pub enum NaginataError {
    /// Malformed or empty query text. Never retried, surfaced immediately.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// An underlying retrieval capability failed (error or timeout) and the
    /// active failure policy does not permit a degraded result.
    #[error("Retriever '{retriever}' unavailable: {reason}")]
    RetrieverUnavailable {
        /// Name of the retriever that failed.
        retriever: String,
        /// Underlying failure description.
        reason: String,
    },

    /// Invalid fusion or retrieval configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Score fusion errors
    #[error("Fusion error: {0}")]
    Fusion(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with NaginataError.
pub type Result<T> = std::result::Result<T, NaginataError>;

impl NaginataError {
    /// Create a new invalid query error.
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        NaginataError::InvalidQuery(msg.into())
    }

    /// Create a new retriever unavailable error.
    pub fn retriever_unavailable<R: Into<String>, S: Into<String>>(retriever: R, reason: S) -> Self {
        NaginataError::RetrieverUnavailable {
            retriever: retriever.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        NaginataError::Config(msg.into())
    }

    /// Create a new fusion error.
    pub fn fusion<S: Into<String>>(msg: S) -> Self {
        NaginataError::Fusion(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        NaginataError::Other(msg.into())
    }

    /// Whether this error identifies a failed retrieval capability.
    pub fn is_retriever_unavailable(&self) -> bool {
        matches!(self, NaginataError::RetrieverUnavailable { .. })
    }
}
