use std::time::{Duration, Instant};

use super::source::{SystemClock, TimeSource, elapsed};

/// Stopwatch for instrumentation.
///
/// A new clock is stopped with zero elapsed time. While running, `elapsed()`
/// reports the span from the last `start()` to now; once stopped it reports the
/// frozen span up to the `stop()` call.
#[derive(Debug, Clone)]
pub struct Clock<T: TimeSource = SystemClock> {
    time: T,
    start: Instant,
    end: Instant,
    running: bool,
}

impl Clock<SystemClock> {
    /// Creates a stopped clock backed by the process clock.
    pub fn new() -> Self {
        Self::with_source(SystemClock)
    }
}

impl Default for Clock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> Clock<T> {
    /// Creates a stopped clock reading from `time`.
    pub fn with_source(time: T) -> Self {
        let now = time.now();
        Self {
            time,
            start: now,
            end: now,
            running: false,
        }
    }

    /// Starts measuring from now. No effect if already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        self.start = self.time.now();
        self.end = self.start;
        self.running = true;
    }

    /// Freezes the measured span. No effect if already stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.end = self.time.now();
        self.running = false;
    }

    /// Stops, returns the measured span, and starts a fresh measurement.
    pub fn restart(&mut self) -> Duration {
        self.stop();
        let span = self.elapsed();
        self.start();
        span
    }

    /// Returns to the stopped, zero-elapsed state.
    pub fn reset(&mut self) {
        self.start = self.time.now();
        self.end = self.start;
        self.running = false;
    }

    pub fn elapsed(&self) -> Duration {
        if self.running {
            self.time.elapsed_since(self.start)
        } else {
            elapsed(self.start, self.end)
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    pub fn elapsed_milliseconds(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }

    pub fn running(&self) -> bool {
        self.running
    }
}
