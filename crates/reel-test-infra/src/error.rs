use thiserror::Error;

/// Failures while provisioning throwaway backends for integration tests.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to manage Redis container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("Redis server at {url} is not reachable")]
    Connect {
        url: String,
        #[source]
        source: redis::RedisError,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
