use thiserror::Error;

/// Errors related to the core domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid movie id: {0}")]
    InvalidMovieId(String),
}

/// Errors raised by a [`DocumentStore`](crate::DocumentStore) backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("invalid store path: {0}")]
    InvalidPath(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid movie record at '{path}': {message}")]
    InvalidRecord { path: String, message: String },
    #[error(transparent)]
    Core(#[from] CoreError),
}
