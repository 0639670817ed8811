use crate::error::CacheError;
use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A non-authoritative accelerator in front of the durable store.
///
/// A cache may drop any entry at any time. An entry it does return must be
/// the record the durable store holds for that code.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Returns the cached record, or `Ok(None)` on a miss.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()>;
}
