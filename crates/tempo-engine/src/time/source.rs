use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time provider.
///
/// Implementations must never return a timestamp earlier than one previously
/// returned from the same instance.
pub trait TimeSource {
    /// Returns the current monotonic timestamp.
    fn now(&self) -> Instant;

    /// Returns the non-negative duration between `start` and now.
    fn elapsed_since(&self, start: Instant) -> Duration {
        elapsed(start, self.now())
    }
}

/// Process clock backed by `Instant::now()`.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time source that only moves when told to.
///
/// Clones share the same timeline, so a test can keep one handle and hand the
/// other to the code under test.
#[derive(Debug, Clone)]
pub struct ManualTime {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Moves the shared timeline forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Moves the shared timeline forward by a number of seconds.
    ///
    /// Negative or non-finite values are ignored to keep the timeline monotonic.
    pub fn advance_secs(&self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.advance(Duration::from_secs_f64(secs));
        }
    }
}

impl Default for ManualTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Returns the current process-monotonic timestamp.
pub fn now() -> Instant {
    Instant::now()
}

/// Duration between two timestamps, saturating to zero if `end` precedes `start`.
pub fn elapsed(start: Instant, end: Instant) -> Duration {
    end.saturating_duration_since(start)
}

/// Duration between `start` and the current process time.
pub fn elapsed_since(start: Instant) -> Duration {
    elapsed(start, now())
}

/// Floating-point views of a `Duration` in common sub-units.
pub trait DurationExt {
    fn secs_f64(&self) -> f64;
    fn millis_f64(&self) -> f64;
    fn micros_f64(&self) -> f64;
    fn nanos_f64(&self) -> f64;
}

impl DurationExt for Duration {
    fn secs_f64(&self) -> f64 {
        self.as_secs_f64()
    }

    fn millis_f64(&self) -> f64 {
        self.as_secs_f64() * 1_000.0
    }

    fn micros_f64(&self) -> f64 {
        self.as_secs_f64() * 1_000_000.0
    }

    fn nanos_f64(&self) -> f64 {
        self.as_nanos() as f64
    }
}
