use async_trait::async_trait;
use reel_core::{
    Catalog, CatalogError, DbPath, DocumentStore, Movie, MovieId, MovieRecord,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

type Result<T> = std::result::Result<T, CatalogError>;

/// A concrete implementation of the [`Catalog`] trait.
///
/// Every operation is a single request against the injected store. Nothing
/// is cached and nothing is retried; store errors reach the caller as
/// [`CatalogError::Store`].
#[derive(Debug)]
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Creates a service sharing an existing store handle.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reads the `movies` collection as `(key, payload)` pairs.
    ///
    /// Returns `None` when the collection is absent or holds no records.
    async fn fetch_collection(&self) -> Result<Option<Vec<(String, Value)>>> {
        let path = DbPath::movies();
        trace!(path = %path, "fetching movie collection");

        let children = match self.store.get(&path).await? {
            None => return Ok(None),
            Some(Value::Object(map)) => map.into_iter().collect::<Vec<_>>(),
            // Collections keyed 0..n may come back as arrays with holes.
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter(|(_, item)| !item.is_null())
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            Some(other) => {
                return Err(CatalogError::InvalidRecord {
                    path: path.to_string(),
                    message: format!("expected a collection, found {}", kind(&other)),
                });
            }
        };

        if children.is_empty() {
            return Ok(None);
        }

        debug!(path = %path, count = children.len(), "fetched movie collection");
        Ok(Some(children))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_record(path: &str, value: Value) -> Result<MovieRecord> {
    if !value.is_object() {
        return Err(CatalogError::InvalidRecord {
            path: path.to_string(),
            message: format!("expected an object, found {}", kind(&value)),
        });
    }

    serde_json::from_value(value).map_err(|e| CatalogError::InvalidRecord {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn decode_entry(key: String, value: Value) -> Result<(String, MovieRecord)> {
    let record = decode_record(&format!("movies/{key}"), value)?;
    Ok((key, record))
}

#[async_trait]
impl<S: DocumentStore> Catalog for CatalogService<S> {
    async fn fetch_movies(&self) -> Result<Vec<Value>> {
        let Some(children) = self.fetch_collection().await? else {
            return Ok(Vec::new());
        };

        Ok(children.into_iter().map(|(_, value)| value).collect())
    }

    async fn fetch_movie_entries(&self) -> Result<Vec<Movie>> {
        let Some(children) = self.fetch_collection().await? else {
            return Ok(Vec::new());
        };

        children
            .into_iter()
            .map(|(key, value)| {
                let (key, record) = decode_entry(key, value)?;
                // Keys come straight from the store, so they are valid segments.
                Ok(record.into_movie(MovieId::new_unchecked(key)))
            })
            .collect()
    }

    async fn fetch_movie_by_id(&self, id: &MovieId) -> Result<Option<Movie>> {
        let path = DbPath::movie(id);
        trace!(id = %id, "fetching movie");

        let Some(value) = self.store.get(&path).await? else {
            info!(id = %id, "movie not found");
            return Ok(None);
        };

        let record = decode_record(&path.to_string(), value)?;
        debug!(id = %id, "fetched movie");
        Ok(Some(record.into_movie(id.clone())))
    }

    async fn add_movie(&self, movie: MovieRecord) -> Result<MovieId> {
        let path = DbPath::movies();
        let value = serde_json::to_value(&movie).map_err(|e| CatalogError::InvalidRecord {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let id = self.store.push(&path, value).await?;
        debug!(id = %id, "added movie");
        Ok(id)
    }

    async fn fetch_genres(&self) -> Result<BTreeSet<String>> {
        let Some(children) = self.fetch_collection().await? else {
            warn!("No movies found in database.");
            return Ok(BTreeSet::new());
        };

        let genres: BTreeSet<String> = children
            .iter()
            .filter_map(|(_, value)| value.get("genre").and_then(Value::as_str))
            .map(str::to_owned)
            .collect();

        debug!(count = genres.len(), "derived genres");
        Ok(genres)
    }
}
