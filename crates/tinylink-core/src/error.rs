use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors returned by [`Shortener`](crate::Shortener) operations.
///
/// A code that does not exist is not an error: `expand` reports it as
/// `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    /// Every candidate up to `max_length` characters was taken by another URL.
    #[error("no free short code of length <= {max_length}")]
    CodeSpaceExhausted { max_length: usize },
    /// The cache or the durable store failed or timed out.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

impl ShortenerError {
    /// Whether the caller may retry the request later with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShortenerError::Unavailable(_))
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        Self::Unavailable(format!("storage: {value}"))
    }
}

impl From<CacheError> for ShortenerError {
    fn from(value: CacheError) -> Self {
        Self::Unavailable(format!("cache: {value}"))
    }
}
