//! Time sources for the machine.
//!
//! The machine never reads wall time directly; it calls a time source
//! returning seconds as `f32`. Games pass their frame clock, tests pass a
//! [`ManualClock`].

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Boxed time source stored by the machine.
pub type TimeSource = Box<dyn Fn() -> f32 + Send + Sync>;

/// Monotonic seconds elapsed since the clock was created.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }

    pub fn source(self) -> TimeSource {
        Box::new(move || self.now())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle
/// and give another to the machine.
///
/// # Example
///
/// ```rust
/// use crossfade::core::ManualClock;
///
/// let clock = ManualClock::new();
/// let source = clock.source();
///
/// clock.advance(0.5);
/// clock.advance(0.25);
/// assert_eq!(source(), 0.75);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU32>,
}

impl ManualClock {
    /// A clock starting at `0.0` seconds.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(seconds: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(seconds.to_bits())),
        }
    }

    pub fn now(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn set(&self, seconds: f32) {
        self.bits.store(seconds.to_bits(), Ordering::Release);
    }

    pub fn advance(&self, delta: f32) {
        self.set(self.now() + delta);
    }

    /// Time source reading this clock.
    pub fn source(&self) -> TimeSource {
        let clock = self.clone();
        Box::new(move || clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now(), 0.0);
        assert_eq!(ManualClock::default().now(), 0.0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(1.0);
        let handle = clock.clone();

        handle.advance(0.5);
        assert_eq!(clock.now(), 1.5);

        clock.set(10.0);
        assert_eq!(handle.now(), 10.0);
    }

    #[test]
    fn source_follows_clock() {
        let clock = ManualClock::new();
        let source = clock.source();

        assert_eq!(source(), 0.0);
        clock.advance(2.0);
        assert_eq!(source(), 2.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
