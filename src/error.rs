use thiserror::Error as ThisError;

/// Error enumerates over all possible errors that this package
/// shall return. Business-rule failures on the catalog, like borrowing
/// a missing book, are not errors, refer to [`crate::Outcome`].
#[derive(Debug, ThisError)]
pub enum Error {
    /// Fatal case, index entries are not in sort-order. Carries the
    /// debug rendering of the offending key and its parent.
    #[error("keys out of order, {0} under {1}")]
    SortError(String, String),
    /// Fatal case, number of nodes does not match the entry count.
    #[error("index count mismatch, counted {counted} expected {expected}")]
    CountMismatch { counted: usize, expected: usize },
    /// Fatal case, reservation queue links are inconsistent.
    #[error("broken reservation queue: {0}")]
    BrokenQueue(String),
    /// Every book id has been handed out or observed.
    #[error("book ids exhausted")]
    IdsExhausted,
    /// Snapshot or configuration document failed to (de)serialize.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration parsed but carries an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for this package.
pub type Result<T> = std::result::Result<T, Error>;
