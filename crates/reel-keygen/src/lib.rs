//! Child key generation for pushes into the document store.

mod clock;
pub mod error;
mod push_id;
pub mod seq;

pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use push_id::{PushIdGenerator, PushIdSettings};
pub use seq::SeqGenerator;

use reel_core::MovieId;

/// Trait for generating child keys.
///
/// Implementations are pure generators that don't interact with storage,
/// so they are responsible for uniqueness on their own.
pub trait KeyGenerator: Send + Sync + 'static {
    /// Generates a key that is unique among the keys this generator has
    /// produced.
    fn generate(&self) -> Result<MovieId, Error>;
}
