use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tinylink_core::{ShortCode, UrlCache, UrlRecord};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::Result;

pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Sizing for a [`MokaUrlCache`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MokaCacheConfig {
    /// Entries kept before the least valuable ones are evicted.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    pub max_capacity: u64,
    /// Drop entries that have not been read for this long.
    #[builder(default, setter(strip_option))]
    pub time_to_idle: Option<Duration>,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// In-process, bounded cache of mappings.
///
/// Suits a single node, or the L1 of a [`LayeredCache`](crate::LayeredCache)
/// in front of Redis. Only hits are stored: a miss leaves no trace, so a
/// code created right after a miss is found on the next read. Clones share
/// the same entries.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    entries: Cache<String, UrlRecord>,
}

impl MokaUrlCache {
    pub fn new() -> Self {
        Self::from_config(MokaCacheConfig::default())
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::from_config(MokaCacheConfig::builder().max_capacity(max_capacity).build())
    }

    pub fn from_config(config: MokaCacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(idle) = config.time_to_idle {
            builder = builder.time_to_idle(idle);
        }

        Self {
            entries: builder.build(),
        }
    }

    /// Number of entries held once pending evictions have run.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let record = self.entries.get(code.as_str()).await;
        if record.is_some() {
            debug!(code = %code, "Moka hit");
        } else {
            trace!(code = %code, "Moka miss");
        }
        Ok(record)
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        self.entries
            .insert(code.as_str().to_owned(), record.clone())
            .await;
        trace!(code = %code, "Stored in Moka");
        Ok(())
    }
}
