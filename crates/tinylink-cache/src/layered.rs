use async_trait::async_trait;
use tinylink_core::{ShortCode, UrlCache, UrlRecord};
use tracing::{debug, trace, warn};

use crate::Result;

/// Two caches stacked: a near one (`L1`, usually Moka) in front of a shared
/// one (`L2`, usually Redis).
///
/// Reads try L1, then L2; an L2 hit is copied into L1. Writes go to L2 first
/// and then to L1. L2 is the layer other instances see, so its errors are
/// returned, while L1 errors on backfill or write are only logged.
///
/// ```rust
/// use tinylink_cache::{LayeredCache, MokaUrlCache};
///
/// // A second Moka stands in for `RedisUrlCache` here.
/// let cache = LayeredCache::new(
///     MokaUrlCache::with_capacity(10_000),
///     MokaUrlCache::with_capacity(100_000),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
}

impl<L1, L2> LayeredCache<L1, L2> {
    pub fn new(l1: L1, l2: L2) -> Self {
        Self { l1, l2 }
    }

    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    pub fn l2(&self) -> &L2 {
        &self.l2
    }
}

#[async_trait]
impl<L1, L2> UrlCache for LayeredCache<L1, L2>
where
    L1: UrlCache,
    L2: UrlCache,
{
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        if let Some(record) = self.l1.get_url(code).await? {
            return Ok(Some(record));
        }

        let Some(record) = self.l2.get_url(code).await? else {
            trace!(code = %code, "Missed both cache layers");
            return Ok(None);
        };

        debug!(code = %code, "Backfilling L1 from L2");
        if let Err(e) = self.l1.set_url(code, &record).await {
            warn!(code = %code, error = %e, "L1 backfill failed");
        }
        Ok(Some(record))
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        self.l2.set_url(code, record).await?;

        if let Err(e) = self.l1.set_url(code, record).await {
            warn!(code = %code, error = %e, "L1 write failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MokaUrlCache, NoopUrlCache};
    use tinylink_core::CacheError;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn two_mokas() -> LayeredCache<MokaUrlCache, MokaUrlCache> {
        LayeredCache::new(
            MokaUrlCache::with_capacity(100),
            MokaUrlCache::with_capacity(100),
        )
    }

    struct BrokenCache;

    #[async_trait]
    impl UrlCache for BrokenCache {
        async fn get_url(&self, _code: &ShortCode) -> Result<Option<UrlRecord>> {
            Err(CacheError::Unavailable("broken".to_string()))
        }

        async fn set_url(&self, _code: &ShortCode, _record: &UrlRecord) -> Result<()> {
            Err(CacheError::Unavailable("broken".to_string()))
        }
    }

    #[tokio::test]
    async fn l1_hit_is_returned() {
        let cache = two_mokas();
        let c = code("abc1234");
        let record = UrlRecord::new("https://example.com");

        cache.l1.set_url(&c, &record).await.unwrap();

        assert_eq!(cache.get_url(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn l2_hit_backfills_l1() {
        let cache = two_mokas();
        let c = code("abc1234");
        let record = UrlRecord::new("https://example.com");

        cache.l2.set_url(&c, &record).await.unwrap();
        assert!(cache.l1.get_url(&c).await.unwrap().is_none());

        assert_eq!(cache.get_url(&c).await.unwrap(), Some(record.clone()));
        assert_eq!(cache.l1.get_url(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn write_reaches_both_layers() {
        let cache = two_mokas();
        let c = code("abc1234");
        let record = UrlRecord::new("https://example.com");

        cache.set_url(&c, &record).await.unwrap();

        assert_eq!(cache.l1.get_url(&c).await.unwrap(), Some(record.clone()));
        assert_eq!(cache.l2.get_url(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn miss_in_both_layers() {
        let cache = two_mokas();

        assert!(cache.get_url(&code("abc1234")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn l2_failure_is_propagated() {
        let cache = LayeredCache::new(MokaUrlCache::new(), BrokenCache);
        let c = code("abc1234");

        assert!(cache.get_url(&c).await.is_err());
        assert!(cache
            .set_url(&c, &UrlRecord::new("https://example.com"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn l1_failure_does_not_fail_the_write() {
        let cache = LayeredCache::new(BrokenCache, MokaUrlCache::new());
        let c = code("abc1234");
        let record = UrlRecord::new("https://example.com");

        cache.set_url(&c, &record).await.unwrap();
        assert_eq!(cache.l2().get_url(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn noop_l1_still_serves_from_l2() {
        let cache = LayeredCache::new(NoopUrlCache, MokaUrlCache::new());
        let c = code("abc1234");
        let record = UrlRecord::new("https://example.com");

        cache.set_url(&c, &record).await.unwrap();
        assert_eq!(cache.get_url(&c).await.unwrap(), Some(record));
    }
}
