use crate::error::StoreError;
use crate::movie_id::MovieId;
use crate::path::DbPath;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A connection to a keyed JSON document store.
///
/// This is the only seam between the catalog and the network. Handles are
/// created once by the caller and shared; implementations must not hold
/// per-call state.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Reads the value at `path`.
    ///
    /// Returns `Ok(None)` if nothing is stored there. An empty collection
    /// is reported as absent.
    async fn get(&self, path: &DbPath) -> Result<Option<Value>>;

    /// Appends `value` as a new child of `path` under a generated key and
    /// returns that key.
    async fn push(&self, path: &DbPath, value: Value) -> Result<MovieId>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn get(&self, path: &DbPath) -> Result<Option<Value>> {
        (**self).get(path).await
    }

    async fn push(&self, path: &DbPath, value: Value) -> Result<MovieId> {
        (**self).push(path, value).await
    }
}
