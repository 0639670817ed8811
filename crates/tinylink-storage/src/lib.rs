//! Durable store implementations for tinylink mappings.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use tinylink_core::{CreateOutcome, ReadRepository, Repository, StorageError, UrlRecord};
