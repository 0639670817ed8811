//! The tinylink short-code engine.
//!
//! [`ShortenerService`] turns URLs into short codes and back. It combines a
//! candidate derivation from `tinylink_generator` with a [`MappingStore`],
//! which puts any `tinylink_cache` cache in front of any `tinylink_storage`
//! repository. Core types are re-exported from `tinylink_core`.

pub mod config;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ShortenerConfig};
pub use service::ShortenerService;
pub use store::MappingStore;
pub use tinylink_core::{ShortCode, Shortener, ShortenerError};
