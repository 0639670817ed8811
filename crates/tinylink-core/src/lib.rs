//! Core types and traits for the tinylink short-code engine.
//!
//! This crate provides the types shared by the generator, the cache and
//! storage backends, and the shortener service.

pub mod cache;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use cache::UrlCache;
pub use error::{CacheError, ShortenerError, StorageError};
pub use repository::{CreateOutcome, ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
