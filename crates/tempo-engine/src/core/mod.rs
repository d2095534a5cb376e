//! Frame scheduling.
//!
//! `FrameScheduler` owns the main loop: it polls the event source, advances a
//! fixed-timestep accumulator, and fans simulation, update, and render out to
//! the `StateStack` before presenting through the backend.

mod config;
mod scheduler;

pub use config::SchedulerConfig;
pub use scheduler::{FrameScheduler, FrameStats, RunState};
