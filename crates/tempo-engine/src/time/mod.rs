//! Time subsystem.
//!
//! Provides monotonic timekeeping that the scheduler and instrumentation share:
//! - `TimeSource` abstracts "now" so frame timing can be driven deterministically in tests
//! - `Clock` is a stopwatch for measuring arbitrary spans (not used by the scheduler itself)

mod clock;
mod source;

pub use clock::Clock;
pub use source::{DurationExt, ManualTime, SystemClock, TimeSource, elapsed, elapsed_since, now};
