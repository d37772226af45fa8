use async_trait::async_trait;
use redis::AsyncCommands;
use reel_core::store::Result;
use reel_core::{DbPath, DocumentStore, MovieId, StoreError};
use reel_keygen::{KeyGenerator, PushIdGenerator};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

const DEFAULT_KEY_PREFIX: &str = "reel:";

/// A Redis-backed implementation of [`DocumentStore`].
///
/// Each collection is one Redis hash named `{prefix}{collection}`. Child
/// keys are hash fields and payloads are stored as JSON strings, so only
/// collection (`movies`) and child (`movies/{id}`) paths are addressable.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    generator: Arc<dyn KeyGenerator>,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

fn parse_payload(location: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        StoreError::InvalidData(format!("invalid JSON stored at '{location}': {e}"))
    })
}

impl RedisStore {
    /// Creates a store over an existing connection, generating push ids for
    /// node 0.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            generator: Arc::new(PushIdGenerator::default()),
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("failed to open Redis client", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    /// Uses a custom prefix for Redis keys (e.g. "myapp:").
    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn with_generator(mut self, generator: impl KeyGenerator) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    /// Splits a path into the Redis hash name and an optional field.
    fn locate<'a>(&self, path: &'a DbPath) -> Result<(String, Option<&'a str>)> {
        let mut segments = path.segments();
        match (segments.next(), segments.next(), segments.next()) {
            (Some(collection), field, None) => {
                Ok((format!("{}{}", self.key_prefix, collection), field))
            }
            _ => Err(StoreError::InvalidPath(format!(
                "'{path}' is not a collection or a direct child of one"
            ))),
        }
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, path: &DbPath) -> Result<Option<Value>> {
        let (key, field) = self.locate(path)?;
        let mut conn = self.conn.clone();

        match field {
            Some(field) => {
                trace!(path = %path, "fetching record from Redis");
                let raw: Option<String> = conn.hget(&key, field).await.map_err(|e| {
                    warn!(path = %path, error = %e, "Redis error on get");
                    map_redis_error("failed to fetch record from Redis", e)
                })?;
                raw.map(|raw| parse_payload(&path.to_string(), &raw))
                    .transpose()
            }
            None => {
                trace!(path = %path, "fetching collection from Redis");
                let entries: BTreeMap<String, String> =
                    conn.hgetall(&key).await.map_err(|e| {
                        warn!(path = %path, error = %e, "Redis error on get");
                        map_redis_error("failed to fetch collection from Redis", e)
                    })?;
                if entries.is_empty() {
                    return Ok(None);
                }

                let mut children = Map::new();
                for (child, raw) in entries {
                    let value = parse_payload(&format!("{path}/{child}"), &raw)?;
                    children.insert(child, value);
                }
                debug!(path = %path, count = children.len(), "fetched collection from Redis");
                Ok(Some(Value::Object(children)))
            }
        }
    }

    async fn push(&self, path: &DbPath, value: Value) -> Result<MovieId> {
        let (key, field) = self.locate(path)?;
        if field.is_some() {
            return Err(StoreError::InvalidPath(format!(
                "cannot push below '{path}': records are leaves"
            )));
        }

        let child = self
            .generator
            .generate()
            .map_err(|e| StoreError::Operation(format!("failed to generate key: {e}")))?;
        let json = serde_json::to_string(&value).map_err(|e| {
            StoreError::InvalidData(format!("failed to serialize payload: {e}"))
        })?;

        let mut conn = self.conn.clone();
        let inserted: bool = conn
            .hset_nx(&key, child.as_str(), json)
            .await
            .map_err(|e| {
                warn!(path = %path, key = %child, error = %e, "Redis error on push");
                map_redis_error("failed to write record to Redis", e)
            })?;

        if !inserted {
            return Err(StoreError::Operation(format!(
                "generated key '{child}' already exists under '{path}'"
            )));
        }

        debug!(path = %path, key = %child, "pushed record to Redis");
        Ok(child)
    }
}
