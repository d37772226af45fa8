use crate::{error::Error, KeyGenerator};
use reel_core::MovieId;
use std::sync::atomic::{AtomicU64, Ordering};

/// A key generator using a sequential counter.
///
/// Produces keys like "m000000", "m000001", etc. Keys are unique within a
/// single instance.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl SeqGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, Error> {
        Self::with_offset(prefix, 0)
    }

    /// Creates a generator whose first key uses `offset` as its counter.
    ///
    /// Fails if the prefix would produce keys the store rejects.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Result<Self, Error> {
        let prefix = prefix.into();
        MovieId::new(format!("{prefix}{offset:06}"))
            .map_err(|e| Error::InvalidPrefix(e.to_string()))?;

        Ok(Self {
            counter: AtomicU64::new(offset),
            prefix,
        })
    }
}

impl KeyGenerator for SeqGenerator {
    fn generate(&self) -> Result<MovieId, Error> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(MovieId::new_unchecked(format!("{}{:06}", self.prefix, count)))
    }
}
