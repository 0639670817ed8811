use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened, byte for byte.
    pub original_url: String,
    /// When the mapping was created.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Creates a record for `original_url` stamped with the current time.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Whether this record aliases exactly `url`.
    pub fn points_to(&self, url: &str) -> bool {
        self.original_url == url
    }
}

/// Outcome of [`Repository::create_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The mapping did not exist and has been stored.
    Created,
    /// A mapping already exists for the code; it is returned unchanged.
    AlreadyExists(UrlRecord),
}

/// A read-only view of the durable store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

/// The durable, authoritative store of mappings.
///
/// Mappings are immutable once created; there is no update or delete.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Atomically stores `record` under `code` unless the code is taken.
    ///
    /// Implementations must perform the check and the write as a single
    /// atomic step against the backing store; concurrent callers racing on
    /// the same code see exactly one `Created`.
    async fn create_if_absent(&self, code: &ShortCode, record: UrlRecord)
        -> Result<CreateOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_to_compares_exact_bytes() {
        let record = UrlRecord::new("https://example.com/a");
        assert!(record.points_to("https://example.com/a"));
        assert!(!record.points_to("https://example.com/a/"));
        assert!(!record.points_to("https://EXAMPLE.com/a"));
    }
}
