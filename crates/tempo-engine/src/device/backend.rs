use anyhow::Result;

use super::{DebugFlags, RenderFrame, SurfaceErrorAction};

/// Flags forwarded to `Backend::initialize`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BackendFlags {
    /// Synchronise presentation with the display refresh.
    pub vsync: bool,

    /// Enable backend validation / debug layers.
    pub debug: bool,
}

/// What the backend reports about itself after initialisation.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BackendCaps {
    /// Human-readable renderer description (API + adapter name).
    pub renderer: String,

    /// Largest supported 2D texture dimension, in texels.
    pub max_texture_size: u32,
}

/// Graphics backend driven by the frame scheduler.
pub trait Backend {
    /// Acquires GPU resources for a surface of `width` x `height` physical pixels.
    ///
    /// On failure nothing acquired by this call may remain held.
    fn initialize(&mut self, width: u32, height: u32, flags: BackendFlags) -> Result<BackendCaps>;

    /// Reconfigures the surface. Fire-and-forget: zero sizes are tolerated.
    fn resize(&mut self, width: u32, height: u32);

    /// Target for this frame's `on_render` fan-out. Called at most once per
    /// frame, before `present_frame`.
    fn frame(&mut self) -> RenderFrame<'_>;

    /// Presents the current frame, including everything submitted through
    /// the `RenderFrame`.
    fn present_frame(&mut self) -> std::result::Result<(), SurfaceErrorAction>;

    /// Applies runtime debug views.
    fn set_debug(&mut self, flags: DebugFlags) {
        let _ = flags;
    }

    /// Releases everything acquired by `initialize`.
    fn shutdown(&mut self);

    /// Current drawable size in physical pixels.
    fn size(&self) -> (u32, u32);
}
