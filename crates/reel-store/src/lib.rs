//! [`DocumentStore`](reel_core::DocumentStore) backends.

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use crate::redis::RedisStore;
