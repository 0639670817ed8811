use thiserror::Error;

/// Failure to bring up or inspect a test container.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("container error: {0}")]
    Container(#[from] testcontainers::TestcontainersError),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
