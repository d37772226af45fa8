use jiff::Timestamp;
use std::time::Duration;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block and wait until the clock reaches the target time.
    fn wait_until(&self, target: Timestamp);
}

/// The wall clock. `wait_until` sleeps the current thread, so callers on an
/// async runtime block their worker for the duration of the wait.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_until(&self, target: Timestamp) {
        // Re-check after each sleep; the system clock may jump.
        loop {
            let now = Timestamp::now();
            if now >= target {
                return;
            }
            let remaining_ms = target.duration_since(now).as_millis().max(1) as u64;
            std::thread::sleep(Duration::from_millis(remaining_ms));
        }
    }
}
