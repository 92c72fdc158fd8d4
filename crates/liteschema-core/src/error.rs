use thiserror::Error;

/// Core error type shared across liteschema crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested table has no catalog entry and is not a system table.
    #[error("not found: {0}")]
    NotFound(String),
    /// The database file or connection cannot be opened.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    /// A column fragment did not yield a column name.
    #[error("malformed column definition: {0}")]
    MalformedDefinition(String),
    /// Query failure on an open source.
    #[error("database error: {0}")]
    Db(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by liteschema crates.
pub type Result<T> = std::result::Result<T, Error>;
