//! Tempo engine crate.
//!
//! A fixed-timestep frame scheduler driving a layered stack of application
//! states, plus the winit/wgpu collaborators it runs against.

pub mod core;
pub mod device;
pub mod input;
pub mod state;
pub mod time;
pub mod window;

pub mod logging;
