use redis::AsyncCommands;
use reel_core::{DbPath, DocumentStore, MovieId, StoreError};
use reel_keygen::SeqGenerator;
use reel_store::RedisStore;
use reel_test_infra::redis::RedisServer;
use serde_json::json;

/// Test fixture that keeps the Redis container alive for the test.
struct Fixture {
    #[allow(dead_code)]
    server: RedisServer,
    store: RedisStore,
    conn: redis::aio::MultiplexedConnection,
}

impl Fixture {
    async fn start() -> Self {
        let server = RedisServer::start()
            .await
            .expect("Failed to start Redis container");
        let conn = server
            .connection()
            .await
            .expect("Failed to get Redis connection");
        let store = RedisStore::new(conn.clone())
            .with_prefix("test:")
            .with_generator(SeqGenerator::with_prefix("m").unwrap());

        Self {
            server,
            store,
            conn,
        }
    }
}

#[tokio::test]
async fn test_redis_store_push_and_get() {
    let fixture = Fixture::start().await;
    let store = &fixture.store;

    assert!(store.get(&DbPath::movies()).await.unwrap().is_none());

    let key = store
        .push(&DbPath::movies(), json!({ "title": "Heat", "genre": "Action" }))
        .await
        .unwrap();
    assert_eq!(key.as_str(), "m000000");

    let record = store.get(&DbPath::movie(&key)).await.unwrap();
    assert_eq!(record, Some(json!({ "title": "Heat", "genre": "Action" })));

    let collection = store.get(&DbPath::movies()).await.unwrap();
    assert_eq!(
        collection,
        Some(json!({ "m000000": { "title": "Heat", "genre": "Action" } }))
    );
}

#[tokio::test]
async fn test_redis_store_uses_one_hash_per_collection() {
    let mut fixture = Fixture::start().await;

    fixture
        .store
        .push(&DbPath::movies(), json!({ "genre": "Drama" }))
        .await
        .unwrap();

    let raw: Option<String> = fixture
        .conn
        .hget("test:movies", "m000000")
        .await
        .unwrap();
    assert_eq!(raw.as_deref(), Some(r#"{"genre":"Drama"}"#));
}

#[tokio::test]
async fn test_redis_store_missing_record() {
    let fixture = Fixture::start().await;

    let record = fixture
        .store
        .get(&DbPath::movie(&MovieId::new("nope").unwrap()))
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_redis_store_rejects_corrupt_payload() {
    let mut fixture = Fixture::start().await;

    let _: () = fixture
        .conn
        .hset("test:movies", "broken", "{not json")
        .await
        .unwrap();

    let err = fixture.store.get(&DbPath::movies()).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[tokio::test]
async fn test_redis_store_rejects_deep_paths() {
    let fixture = Fixture::start().await;
    let id = MovieId::new("movie1").unwrap();
    let deep = DbPath::movie(&id).child(&MovieId::new("cast").unwrap());

    let err = fixture.store.get(&deep).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));

    let err = fixture
        .store
        .push(&DbPath::movie(&id), json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
}
