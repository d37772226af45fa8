use async_trait::async_trait;
use parking_lot::RwLock;
use reel_core::store::Result;
use reel_core::{DbPath, DocumentStore, MovieId, StoreError};
use reel_keygen::{KeyGenerator, PushIdGenerator};
use serde_json::{Map, Value};
use tracing::trace;

/// In-memory implementation of [`DocumentStore`] holding a single JSON tree.
///
/// Useful for local runs and tests. Supports paths of any depth.
pub struct InMemoryStore {
    root: RwLock<Map<String, Value>>,
    generator: Box<dyn KeyGenerator>,
}

impl InMemoryStore {
    /// Creates an empty store generating push ids for node 0.
    pub fn new() -> Self {
        Self::with_generator(PushIdGenerator::default())
    }

    /// Creates an empty store using `generator` for pushed keys.
    pub fn with_generator(generator: impl KeyGenerator) -> Self {
        Self {
            root: RwLock::new(Map::new()),
            generator: Box::new(generator),
        }
    }

    /// Replaces the value at `path`, creating intermediate objects.
    ///
    /// Seeds fixtures under caller-chosen keys; the catalog itself only
    /// appends through [`DocumentStore::push`].
    pub fn set(&self, path: &DbPath, value: Value) -> Result<()> {
        let mut root = self.root.write();
        let mut segments: Vec<&str> = path.segments().collect();
        let Some(last) = segments.pop() else {
            return match value {
                Value::Object(map) => {
                    *root = map;
                    Ok(())
                }
                _ => Err(StoreError::InvalidPath(
                    "the root can only hold an object".to_string(),
                )),
            };
        };

        let parent = descend_mut(&mut root, &segments, path)?;
        parent.insert(last.to_owned(), value);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("root", &*self.root.read())
            .finish_non_exhaustive()
    }
}

/// Walks to the object at `segments`, creating empty objects on the way.
fn descend_mut<'a>(
    root: &'a mut Map<String, Value>,
    segments: &[&str],
    path: &DbPath,
) -> Result<&'a mut Map<String, Value>> {
    let mut node = root;
    for segment in segments {
        let child = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        node = child.as_object_mut().ok_or_else(|| {
            StoreError::InvalidPath(format!("'{path}' descends into a non-object value"))
        })?;
    }
    Ok(node)
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, path: &DbPath) -> Result<Option<Value>> {
        trace!(path = %path, "reading from in-memory store");
        let root = self.root.read();

        let mut segments = path.segments();
        let Some(first) = segments.next() else {
            return Ok((!root.is_empty()).then(|| Value::Object(root.clone())));
        };

        let mut node = root.get(first);
        for segment in segments {
            node = node.and_then(|value| value.get(segment));
        }

        Ok(node.filter(|value| !is_absent(value)).cloned())
    }

    async fn push(&self, path: &DbPath, value: Value) -> Result<MovieId> {
        let key = self
            .generator
            .generate()
            .map_err(|e| StoreError::Operation(format!("failed to generate key: {e}")))?;
        trace!(path = %path, key = %key, "pushing to in-memory store");

        let segments: Vec<&str> = path.segments().collect();
        let mut root = self.root.write();
        let parent = descend_mut(&mut root, &segments, path)?;
        if parent.contains_key(key.as_str()) {
            return Err(StoreError::Operation(format!(
                "generated key '{key}' already exists under '{path}'"
            )));
        }
        parent.insert(key.as_str().to_owned(), value);

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_keygen::SeqGenerator;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> InMemoryStore {
        InMemoryStore::with_generator(SeqGenerator::with_prefix("m").unwrap())
    }

    fn id(s: &str) -> MovieId {
        MovieId::new_unchecked(s)
    }

    #[tokio::test]
    async fn push_and_get() {
        let store = store();

        let key = store
            .push(&DbPath::movies(), json!({ "genre": "Action" }))
            .await
            .unwrap();
        assert_eq!(key.as_str(), "m000000");

        let record = store.get(&DbPath::movie(&key)).await.unwrap();
        assert_eq!(record, Some(json!({ "genre": "Action" })));

        let collection = store.get(&DbPath::movies()).await.unwrap();
        assert_eq!(
            collection,
            Some(json!({ "m000000": { "genre": "Action" } }))
        );
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = store();

        assert!(store.get(&DbPath::movies()).await.unwrap().is_none());
        assert!(store
            .get(&DbPath::movie(&id("nope")))
            .await
            .unwrap()
            .is_none());
        assert!(store.get(&DbPath::root()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_collection_is_absent() {
        let store = store();
        store.set(&DbPath::movies(), json!({})).unwrap();

        assert!(store.get(&DbPath::movies()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_replaces_value() {
        let store = store();
        let path = DbPath::movie(&id("movie1"));

        store.set(&path, json!({ "genre": "Drama" })).unwrap();
        store.set(&path, json!({ "genre": "Comedy" })).unwrap();

        assert_eq!(
            store.get(&path).await.unwrap(),
            Some(json!({ "genre": "Comedy" }))
        );
    }

    #[tokio::test]
    async fn push_into_scalar_fails() {
        let store = store();
        store.set(&DbPath::movies(), json!("not a collection")).unwrap();

        let err = store
            .push(&DbPath::movies(), json!({ "genre": "Action" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn duplicate_generated_key_fails() {
        let store = store();
        store
            .set(&DbPath::movie(&id("m000000")), json!({ "genre": "Drama" }))
            .unwrap();

        let err = store
            .push(&DbPath::movies(), json!({ "genre": "Action" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));
    }

    #[tokio::test]
    async fn default_store_uses_push_ids() {
        let store = InMemoryStore::new();

        let key = store
            .push(&DbPath::movies(), json!({ "genre": "Action" }))
            .await
            .unwrap();
        assert_eq!(key.as_str().len(), 20);
    }

    #[tokio::test]
    async fn concurrent_pushes() {
        let store = Arc::new(store());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .push(&DbPath::movies(), json!({ "genre": format!("g{i}") }))
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let collection = store.get(&DbPath::movies()).await.unwrap().unwrap();
        assert_eq!(collection.as_object().unwrap().len(), 10);
    }
}
