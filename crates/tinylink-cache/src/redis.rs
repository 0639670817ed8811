use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tinylink_core::{CacheError, ShortCode, UrlCache, UrlRecord};
use tracing::{debug, trace, warn};

use crate::Result;

/// Namespace for cache keys unless one is given explicitly.
pub const DEFAULT_KEY_PREFIX: &str = "tl:url:";

/// Shared cache of mappings in Redis.
///
/// Each mapping is one string key, `<prefix><code>`, holding the JSON form of
/// the [`UrlRecord`]. Mappings never change, so keys are written without an
/// expiry and memory pressure is left to the server's eviction policy.
#[derive(Clone)]
pub struct RedisUrlCache {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUrlCache")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisUrlCache {
    /// Wraps a managed connection, which reconnects on its own after failures.
    pub fn new(conn: ConnectionManager) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a managed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client =
            redis::Client::open(redis_url).map_err(|e| map_redis_error("open client", e))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| map_redis_error("connect", e))?;
        Ok(Self::new(conn))
    }

    fn key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

fn encode(record: &UrlRecord) -> Result<String> {
    serde_json::to_string(record)
        .map_err(|e| CacheError::Serialization(format!("encode record: {e}")))
}

fn decode(key: &str, raw: &str) -> Result<UrlRecord> {
    serde_json::from_str(raw)
        .map_err(|e| CacheError::InvalidData(format!("value under '{key}' is not a record: {e}")))
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("redis {operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        CacheError::Timeout(message)
    } else if lowered.contains("connection") || lowered.contains("broken pipe") {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let key = self.key(code);
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.get(&key).await.map_err(|e| {
            warn!(code = %code, error = %e, "Redis GET failed");
            map_redis_error("get", e)
        })?;

        match raw {
            Some(raw) => {
                debug!(code = %code, "Redis hit");
                decode(&key, &raw).map(Some)
            }
            None => {
                trace!(code = %code, "Redis miss");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        let key = self.key(code);
        let value = encode(record)?;
        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(&key, value).await.map_err(|e| {
            warn!(code = %code, error = %e, "Redis SET failed");
            map_redis_error("set", e)
        })?;
        trace!(code = %code, "Stored in Redis");
        Ok(())
    }
}
