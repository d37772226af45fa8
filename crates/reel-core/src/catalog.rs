use crate::error::CatalogError;
use crate::movie::{Movie, MovieRecord};
use crate::movie_id::MovieId;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeSet;

type Result<T> = std::result::Result<T, CatalogError>;

/// Read and append access to the movie collection.
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Returns every stored movie payload, unmodified, in store order.
    /// Payloads are not interpreted, so no record shape can fail the call.
    async fn fetch_movies(&self) -> Result<Vec<Value>>;

    /// Returns every stored movie with its key merged in as `id`.
    async fn fetch_movie_entries(&self) -> Result<Vec<Movie>>;

    /// Looks up a single movie.
    /// Returns `None` if the key does not exist.
    async fn fetch_movie_by_id(&self, id: &MovieId) -> Result<Option<Movie>>;

    /// Appends a movie under a generated key and returns the key.
    async fn add_movie(&self, movie: MovieRecord) -> Result<MovieId>;

    /// Returns the distinct genres across all stored movies.
    /// Records without a string `genre` are skipped.
    /// An absent collection yields an empty set.
    async fn fetch_genres(&self) -> Result<BTreeSet<String>>;
}
