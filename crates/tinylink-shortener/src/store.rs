use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tinylink_core::{CreateOutcome, Repository, ShortCode, ShortenerError, UrlCache, UrlRecord};
use tracing::{debug, trace, warn};

/// The cache plus the durable store, seen as one mapping store.
///
/// Reads go to the cache first and fall back to the durable store, which
/// stays authoritative. Writes go to the durable store only; the cache is
/// populated afterwards on a best-effort basis. Every backend call is bounded
/// by `op_timeout`, and an expired call surfaces as
/// [`ShortenerError::Unavailable`].
#[derive(Debug)]
pub struct MappingStore<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    op_timeout: Duration,
}

impl<R, C> Clone for MappingStore<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            op_timeout: self.op_timeout,
        }
    }
}

impl<R: Repository, C: UrlCache> MappingStore<R, C> {
    pub fn new(repository: R, cache: C, op_timeout: Duration) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: Arc::new(cache),
            op_timeout,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Finds the mapping for `code`, or `None` if it was never created.
    ///
    /// A cache failure is returned as is: a broken cache and an absent code
    /// must not look alike. A store hit refills the cache.
    pub async fn lookup(&self, code: &ShortCode) -> Result<Option<UrlRecord>, ShortenerError> {
        trace!(code = %code, "Looking up mapping");

        if let Some(record) = self.bounded("cache read", self.cache.get_url(code)).await? {
            debug!(code = %code, "Cache hit");
            return Ok(Some(record));
        }

        match self.bounded("store read", self.repository.get(code)).await? {
            Some(record) => {
                debug!(code = %code, "Store hit, populating cache");
                self.populate_cache(code, &record).await;
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "Mapping not found");
                Ok(None)
            }
        }
    }

    /// Atomically creates `code -> url` unless `code` is already mapped.
    ///
    /// On `AlreadyExists` the existing mapping is returned and nothing is
    /// overwritten.
    pub async fn try_create(
        &self,
        code: &ShortCode,
        url: &str,
    ) -> Result<CreateOutcome, ShortenerError> {
        let record = UrlRecord::new(url);
        let outcome = self
            .bounded(
                "store create",
                self.repository.create_if_absent(code, record.clone()),
            )
            .await?;

        if outcome == CreateOutcome::Created {
            debug!(code = %code, "Created mapping");
            self.populate_cache(code, &record).await;
        }

        Ok(outcome)
    }

    async fn populate_cache(&self, code: &ShortCode, record: &UrlRecord) {
        match tokio::time::timeout(self.op_timeout, self.cache.set_url(code, record)).await {
            Ok(Ok(())) => trace!(code = %code, "Cache populated"),
            Ok(Err(e)) => warn!(code = %code, error = %e, "Failed to populate cache"),
            Err(_) => warn!(
                code = %code,
                timeout = ?self.op_timeout,
                "Timed out populating cache"
            ),
        }
    }

    async fn bounded<T, E>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, ShortenerError>
    where
        E: Into<ShortenerError> + std::fmt::Display,
    {
        match tokio::time::timeout(self.op_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(operation, error = %e, "Backend call failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(operation, timeout = ?self.op_timeout, "Backend call timed out");
                Err(ShortenerError::Unavailable(format!(
                    "{operation} timed out after {:?}",
                    self.op_timeout
                )))
            }
        }
    }
}
