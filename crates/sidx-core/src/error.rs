//! Error types and handling for sidx-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Errors are
//! grouped by the subsystem they originate from (I/O, network, parsing,
//! indexing, storage, configuration) and carry enough context to be shown
//! to a user directly. [`Error::is_recoverable`] marks failures that a
//! caller may reasonably retry.

use thiserror::Error;

/// The main error type for sidx-core operations.
///
/// `Display` produces user-facing messages; the source chain is preserved
/// for variants wrapping standard library or `reqwest` errors.
#[derive(Error, Debug)]
pub enum Error {
    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request for a remote search index failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A search index file or markdown page could not be parsed.
    ///
    /// Covers malformed JSON payloads, a missing top-level `docs` key,
    /// and markdown that the tree-sitter grammar rejects outright.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search index operation failed.
    ///
    /// Wraps tantivy errors from creating, writing, or querying the
    /// on-disk index, including schema mismatches on open.
    #[error("Index error: {0}")]
    Index(String),

    /// Cache storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested source, file, or record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Network timeouts, connection failures, and interrupted I/O may
    /// succeed on retry. Parse, validation, and configuration failures
    /// are permanent until the input changes.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a static string identifier.
    ///
    /// Used for logging and for grouping failures in the CLI's JSON
    /// output.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Index(_) => "index",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
