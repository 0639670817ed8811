//! Disposable backing services for integration tests.
//!
//! Each fixture starts a container through testcontainers and tears it
//! down when dropped. A running Docker daemon is required.

pub mod error;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
