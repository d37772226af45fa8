use crate::{
    clock::{Clock, SystemClock},
    error::Error,
    KeyGenerator,
};
use jiff::Timestamp;
use reel_core::MovieId;
use std::sync::Mutex;
use typed_builder::TypedBuilder;

/// Key alphabet, in ascending ASCII order so keys sort chronologically.
const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIMESTAMP_CHARS: usize = 8;
const SUFFIX_CHARS: usize = 12;
const SEQUENCE_BITS: u32 = 48;
const MAX_SEQUENCE: u64 = (1_u64 << SEQUENCE_BITS) - 1;
const MAX_NODE_ID: u32 = (1_u32 << 24) - 1;
/// Largest backward clock step that is absorbed by waiting.
const MAX_BACKWARD_MILLIS: i64 = 1_000;

/// Configures a push id generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct PushIdSettings {
    /// A unique node index in the range `[0, 2^24)`.
    ///
    /// Generators sharing a store must use distinct node ids.
    #[builder(default)]
    pub node_id: u32,
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_millis: Option<i64>,
    sequence: u64,
}

/// Generates 20 character push keys that sort in creation order.
///
/// The first 8 characters encode the creation time in milliseconds; the
/// remaining 12 encode the node id followed by a per-millisecond sequence.
pub struct PushIdGenerator<C: Clock = SystemClock> {
    node_id: u32,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl PushIdGenerator<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: PushIdSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> PushIdGenerator<C> {
    pub fn with_clock(settings: PushIdSettings, clock: C) -> Result<Self, Error> {
        if settings.node_id > MAX_NODE_ID {
            return Err(Error::InvalidNodeId {
                node_id: settings.node_id,
                max_node_id: MAX_NODE_ID,
            });
        }

        Ok(Self {
            node_id: settings.node_id,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    /// Generates the next push key.
    ///
    /// If the clock moves backward by at most one second, or the sequence
    /// for the current millisecond is exhausted, this blocks the calling
    /// thread (holding the generator lock) until the clock catches up. A
    /// larger backward step fails with [`Error::ClockMovedBackward`].
    pub fn next_key(&self) -> Result<String, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let mut now = self.clock.now();

        if let Some(last) = state.last_millis {
            let behind = last - now.as_millisecond();
            if behind > MAX_BACKWARD_MILLIS {
                return Err(Error::ClockMovedBackward { by_millis: behind });
            }
            if behind > 0 {
                self.clock.wait_until(millis_to_timestamp(last)?);
                now = self.clock.now();
            }

            if now.as_millisecond() == last {
                if state.sequence < MAX_SEQUENCE {
                    state.sequence += 1;
                } else {
                    self.clock.wait_until(millis_to_timestamp(last + 1)?);
                    now = self.clock.now();
                    state.sequence = 0;
                }
            } else {
                state.sequence = 0;
            }
        }

        let millis = now.as_millisecond();
        if millis < 0 {
            return Err(Error::ClockBeforeEpoch(now));
        }

        state.last_millis = Some(millis);

        let suffix = (u128::from(self.node_id) << SEQUENCE_BITS) | u128::from(state.sequence);
        let mut key = String::with_capacity(TIMESTAMP_CHARS + SUFFIX_CHARS);
        encode(millis as u128, TIMESTAMP_CHARS, &mut key);
        encode(suffix, SUFFIX_CHARS, &mut key);
        Ok(key)
    }
}

impl Default for PushIdGenerator<SystemClock> {
    /// A system clock generator for node 0.
    fn default() -> Self {
        Self {
            node_id: 0,
            clock: SystemClock,
            state: Mutex::new(GeneratorState::default()),
        }
    }
}

impl<C: Clock + 'static> KeyGenerator for PushIdGenerator<C> {
    fn generate(&self) -> Result<MovieId, Error> {
        // Keys only use the alphabet above, which is always a valid segment.
        self.next_key().map(MovieId::new_unchecked)
    }
}

fn millis_to_timestamp(millis: i64) -> Result<Timestamp, Error> {
    Timestamp::from_millisecond(millis).map_err(|_| Error::ClockBeforeEpoch(Timestamp::MIN))
}

/// Appends the low `chars * 6` bits of `value`, most significant first.
fn encode(value: u128, chars: usize, out: &mut String) {
    for i in (0..chars).rev() {
        let index = ((value >> (i * 6)) & 0x3f) as usize;
        out.push(ALPHABET[index] as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_clock::TestClock;

    fn make_generator(node_id: u32, clock: TestClock) -> PushIdGenerator<TestClock> {
        let settings = PushIdSettings::builder().node_id(node_id).build();
        PushIdGenerator::with_clock(settings, clock).unwrap()
    }

    #[test]
    fn alphabet_is_sorted() {
        assert!(ALPHABET.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn keys_are_twenty_characters() {
        let generator = make_generator(0, TestClock::at_millis(1_700_000_000_000));
        let key = generator.next_key().unwrap();
        assert_eq!(key.len(), 20);
        assert!(MovieId::new(key).is_ok());
    }

    #[test]
    fn epoch_encodes_as_dashes() {
        let generator = make_generator(0, TestClock::at_millis(0));
        assert_eq!(generator.next_key().unwrap(), "-".repeat(20));
    }

    #[test]
    fn same_millisecond_increments_sequence() {
        let generator = make_generator(0, TestClock::at_millis(1_000));
        let k0 = generator.next_key().unwrap();
        let k1 = generator.next_key().unwrap();
        let k2 = generator.next_key().unwrap();

        assert_eq!(&k0[..8], &k1[..8]);
        assert!(k0.ends_with("------------"));
        assert!(k1.ends_with("-----------0"));
        assert!(k2.ends_with("-----------1"));
    }

    #[test]
    fn keys_sort_in_creation_order() {
        let clock = TestClock::at_millis(1_700_000_000_000);
        let generator = make_generator(7, clock.clone());

        let mut keys = Vec::new();
        for step in 0..50 {
            keys.push(generator.next_key().unwrap());
            if step % 3 == 0 {
                clock.advance_millis(1);
            }
        }

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
    }

    #[test]
    fn clock_moving_backward_waits() {
        let clock = TestClock::at_millis(5_000);
        let generator = make_generator(0, clock.clone());
        let first = generator.next_key().unwrap();

        clock.set_millis(4_000);
        let second = generator.next_key().unwrap();

        assert!(second > first);
        assert_eq!(clock.now().as_millisecond(), 5_000);
    }

    #[test]
    fn large_backward_step_fails_without_waiting() {
        let clock = TestClock::at_millis(5_000);
        let generator = make_generator(0, clock.clone());
        generator.next_key().unwrap();

        clock.set_millis(3_000);
        assert_eq!(
            generator.next_key(),
            Err(Error::ClockMovedBackward { by_millis: 2_000 })
        );
        assert_eq!(clock.now().as_millisecond(), 3_000);

        // Once the clock is back within range, generation resumes.
        clock.set_millis(4_500);
        assert!(generator.next_key().is_ok());
        assert_eq!(clock.now().as_millisecond(), 5_000);
    }

    #[test]
    fn node_id_is_embedded() {
        let clock = TestClock::at_millis(1_000);
        let a = make_generator(1, clock.clone()).next_key().unwrap();
        let b = make_generator(2, clock).next_key().unwrap();

        assert_eq!(&a[..8], &b[..8]);
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_node_id() {
        let settings = PushIdSettings::builder().node_id(MAX_NODE_ID + 1).build();
        let err = PushIdGenerator::with_clock(settings, TestClock::at_millis(0))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidNodeId { .. }));
    }

    #[test]
    fn clock_before_epoch() {
        let generator = make_generator(0, TestClock::at_millis(-1));
        assert!(matches!(
            generator.next_key(),
            Err(Error::ClockBeforeEpoch(_))
        ));
    }
}
