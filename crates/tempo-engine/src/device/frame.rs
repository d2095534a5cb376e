/// Debug views toggled at runtime.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DebugFlags {
    /// Periodic frame statistics in the log.
    pub stats: bool,

    /// States with their own pipelines should switch to `PolygonMode::Line`
    /// (requires `Features::POLYGON_MODE_LINE`).
    pub wireframe: bool,
}

/// Target handed to `State::on_render` for one frame.
///
/// Headless backends (tests, minimised windows, failed acquisition) produce a
/// frame without GPU access; states must treat drawing as optional.
pub struct RenderFrame<'a> {
    /// Drawable size in physical pixels.
    pub size: (u32, u32),
    pub debug: DebugFlags,
    gpu: Option<GpuFrame<'a>>,
}

impl<'a> RenderFrame<'a> {
    pub fn headless(size: (u32, u32)) -> Self {
        Self {
            size,
            debug: DebugFlags::default(),
            gpu: None,
        }
    }

    pub fn with_gpu(size: (u32, u32), gpu: GpuFrame<'a>) -> Self {
        Self {
            size,
            debug: DebugFlags::default(),
            gpu: Some(gpu),
        }
    }

    pub fn gpu(&mut self) -> Option<&mut GpuFrame<'a>> {
        self.gpu.as_mut()
    }

    pub fn is_headless(&self) -> bool {
        self.gpu.is_none()
    }
}

/// GPU access for one frame.
///
/// The backend has already recorded a clear of the whole target. Command
/// buffers passed to `submit` run after it, in submission order, so lower
/// layers draw first.
pub struct GpuFrame<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub format: wgpu::TextureFormat,
    /// Sample count pipelines drawing into `color_attachment` must use.
    pub sample_count: u32,
    target: &'a wgpu::TextureView,
    resolve: Option<&'a wgpu::TextureView>,
    commands: &'a mut Vec<wgpu::CommandBuffer>,
}

impl<'a> GpuFrame<'a> {
    /// `resolve` is the surface view when `target` is a multisampled texture.
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        format: wgpu::TextureFormat,
        sample_count: u32,
        target: &'a wgpu::TextureView,
        resolve: Option<&'a wgpu::TextureView>,
        commands: &'a mut Vec<wgpu::CommandBuffer>,
    ) -> Self {
        Self {
            device,
            queue,
            format,
            sample_count,
            target,
            resolve,
            commands,
        }
    }

    /// Color attachment for this frame's target. Use `LoadOp::Load` to draw
    /// over earlier layers.
    pub fn color_attachment(&self, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.target,
            resolve_target: self.resolve,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }

    pub fn submit(&mut self, commands: wgpu::CommandBuffer) {
        self.commands.push(commands);
    }
}
