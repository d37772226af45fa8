use jiff::Timestamp;
use thiserror::Error;

/// Errors returned by key generator initialization and key generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid node id {node_id}; expected 0..={max_node_id}")]
    InvalidNodeId { node_id: u32, max_node_id: u32 },
    #[error("clock is before the unix epoch: {0}")]
    ClockBeforeEpoch(Timestamp),
    #[error("clock moved backward by {by_millis}ms; refusing to wait that long")]
    ClockMovedBackward { by_millis: i64 },
    #[error("invalid key prefix: {0}")]
    InvalidPrefix(String),
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}
