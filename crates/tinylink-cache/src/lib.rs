//! Cache implementations for the tinylink mapping store.
//!
//! Every cache here implements [`UrlCache`] and is purely an accelerator:
//! the durable store stays the source of truth.

pub mod layered;
pub mod moka;
pub mod noop;
pub mod redis;

pub use self::moka::{MokaCacheConfig, MokaUrlCache};
pub use self::redis::RedisUrlCache;
pub use layered::LayeredCache;
pub use noop::NoopUrlCache;
pub use tinylink_core::{CacheError, UrlCache};

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;
