//! Rendering backend.
//!
//! The scheduler only talks to the `Backend` trait: initialise once, resize on
//! `Event::Resized`, render and present once per frame, shut down when dropped.
//! `WgpuBackend` is the concrete implementation over a winit window:
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates & configures the Surface (swapchain)
//! - clears one surface texture per frame, hands it to the states through a
//!   `RenderFrame`, then presents it

mod backend;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use backend::{Backend, BackendCaps, BackendFlags};
pub use error::SurfaceErrorAction;
pub use frame::{DebugFlags, GpuFrame, RenderFrame};
pub use gpu::WgpuBackend;
pub use init::GpuInit;
