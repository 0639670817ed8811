use async_trait::async_trait;
use tinylink_core::{ShortCode, UrlCache, UrlRecord};
use tracing::trace;

use crate::Result;

/// A cache that stores nothing.
///
/// Every lookup misses and every write is discarded, so all reads go to the
/// durable store. Used when caching is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUrlCache;

#[async_trait]
impl UrlCache for NoopUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Caching disabled, reporting miss");
        Ok(None)
    }

    async fn set_url(&self, _code: &ShortCode, _record: &UrlRecord) -> Result<()> {
        Ok(())
    }
}
