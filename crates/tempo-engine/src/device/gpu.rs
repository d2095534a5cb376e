use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{
    Backend, BackendCaps, BackendFlags, DebugFlags, GpuFrame, GpuInit, RenderFrame,
    SurfaceErrorAction,
};

/// Frames between statistics lines while `DebugFlags::stats` is on.
const STATS_INTERVAL: u64 = 120;

/// Live wgpu objects, present only between `initialize` and `shutdown`.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    sample_count: u32,
    msaa: Option<wgpu::TextureView>,
}

impl Gpu {
    /// The view passes render into, and the view it resolves to.
    fn targets<'a>(
        &'a self,
        surface_view: &'a wgpu::TextureView,
    ) -> (&'a wgpu::TextureView, Option<&'a wgpu::TextureView>) {
        match &self.msaa {
            Some(msaa) => (msaa, Some(surface_view)),
            None => (surface_view, None),
        }
    }

    fn encode_clear(&self, surface_view: &wgpu::TextureView, [r, g, b, a]: [f64; 4]) -> wgpu::CommandBuffer {
        let (view, resolve_target) = self.targets(surface_view);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tempo clear encoder"),
            });

        // Clear pass, dropped before the encoder is finished.
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tempo clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        encoder.finish()
    }
}

/// Surface texture acquired for the current frame plus the work recorded into it.
struct PendingFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    commands: Vec<wgpu::CommandBuffer>,
}

/// wgpu implementation of `Backend` for one winit window.
///
/// Every frame starts with a clear to `GpuInit::clear_color`; states draw on
/// top through the `GpuFrame` in their `RenderFrame`.
pub struct WgpuBackend {
    window: Arc<Window>,
    init: GpuInit,
    gpu: Option<Gpu>,
    pending: Option<PendingFrame>,
    acquire_error: Option<SurfaceErrorAction>,
    debug: DebugFlags,
    presented: u64,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, init: GpuInit) -> Self {
        Self {
            window,
            init,
            gpu: None,
            pending: None,
            acquire_error: None,
            debug: DebugFlags::default(),
            presented: 0,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    async fn create_gpu(&self, extent: PhysicalSize<u32>, flags: BackendFlags) -> Result<(Gpu, BackendCaps)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: self.init.backends,
            flags: if flags.debug {
                wgpu::InstanceFlags::debugging()
            } else {
                wgpu::InstanceFlags::from_build_config()
            },
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&self.window))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("no GPU adapter for backends {:?}", self.init.backends))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tempo device"),
                required_features: self.init.required_features,
                required_limits: self.init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, self.init.prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, self.init.alpha_mode);
        let sample_count = surface::supported_sample_count(
            adapter.get_texture_format_features(format).flags,
            self.init.sample_count,
        );

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: extent.width,
            height: extent.height,
            present_mode: surface::present_mode(flags.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: self.init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);
        let msaa = surface::create_msaa_view(&device, &config, sample_count);

        let info = adapter.get_info();
        let backend_caps = BackendCaps {
            renderer: format!("{:?} ({})", info.backend, info.name),
            max_texture_size: device.limits().max_texture_dimension_2d,
        };

        let gpu = Gpu {
            surface,
            device,
            queue,
            config,
            size: extent,
            sample_count,
            msaa,
        };

        Ok((gpu, backend_caps))
    }

    /// Acquires the surface texture and records the clear pass.
    fn acquire(&mut self) -> std::result::Result<(), SurfaceErrorAction> {
        let Some(gpu) = self.gpu.as_ref() else {
            return Err(SurfaceErrorAction::SkipFrame);
        };

        if gpu.size.width == 0 || gpu.size.height == 0 {
            return Err(SurfaceErrorAction::SkipFrame);
        }

        let texture = gpu.surface.get_current_texture().map_err(|err| {
            surface::map_surface_error(&gpu.surface, &gpu.device, &gpu.config, gpu.size, err)
        })?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let clear = gpu.encode_clear(&view, self.init.clear_color_rgba());

        self.pending = Some(PendingFrame {
            texture,
            view,
            commands: vec![clear],
        });
        Ok(())
    }
}

impl Backend for WgpuBackend {
    fn initialize(&mut self, width: u32, height: u32, flags: BackendFlags) -> Result<BackendCaps> {
        let extent = surface::initial_extent(self.window.inner_size(), width, height);

        // Adapter/device acquisition is asynchronous under wgpu. On error every
        // partially created object is dropped before returning.
        let (gpu, caps) = pollster::block_on(self.create_gpu(extent, flags))?;
        if gpu.sample_count > 1 {
            log::info!("{}x MSAA enabled", gpu.sample_count);
        }
        self.gpu = Some(gpu);

        Ok(caps)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        gpu.size = PhysicalSize::new(width, height);

        // wgpu rejects 0x0 surfaces (minimised windows); reconfigure once visible again.
        if width == 0 || height == 0 {
            return;
        }

        gpu.config.width = width;
        gpu.config.height = height;
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.msaa = surface::create_msaa_view(&gpu.device, &gpu.config, gpu.sample_count);
        log::debug!("surface resized to {width}x{height}");
    }

    fn frame(&mut self) -> RenderFrame<'_> {
        let size = self.size();

        if self.pending.is_none() {
            self.acquire_error = self.acquire().err();
        }

        match (self.gpu.as_ref(), self.pending.as_mut()) {
            (Some(gpu), Some(pending)) => {
                let PendingFrame { view, commands, .. } = pending;
                let (target, resolve) = gpu.targets(&*view);
                let frame = GpuFrame::new(
                    &gpu.device,
                    &gpu.queue,
                    gpu.config.format,
                    gpu.sample_count,
                    target,
                    resolve,
                    commands,
                );
                RenderFrame::with_gpu(size, frame)
            }
            _ => RenderFrame::headless(size),
        }
    }

    fn present_frame(&mut self) -> std::result::Result<(), SurfaceErrorAction> {
        if let Some(action) = self.acquire_error.take() {
            return Err(action);
        }
        if self.pending.is_none() {
            self.acquire()?;
        }

        let (Some(gpu), Some(frame)) = (self.gpu.as_ref(), self.pending.take()) else {
            return Err(SurfaceErrorAction::SkipFrame);
        };

        gpu.queue.submit(frame.commands);
        self.window.pre_present_notify();
        frame.texture.present();

        self.presented += 1;
        if self.debug.stats && self.presented % STATS_INTERVAL == 0 {
            log::info!(
                "frame {}: {}x{} {:?}, {}x MSAA, wireframe {}",
                self.presented,
                gpu.size.width,
                gpu.size.height,
                gpu.config.format,
                gpu.sample_count,
                self.debug.wireframe
            );
        }

        Ok(())
    }

    fn set_debug(&mut self, flags: DebugFlags) {
        if flags != self.debug {
            log::info!("debug views: stats {}, wireframe {}", flags.stats, flags.wireframe);
        }
        self.debug = flags;
    }

    fn shutdown(&mut self) {
        self.pending = None;
        if self.gpu.take().is_some() {
            log::debug!("wgpu backend shut down");
        }
    }

    fn size(&self) -> (u32, u32) {
        match &self.gpu {
            Some(gpu) => (gpu.size.width, gpu.size.height),
            None => {
                let size = self.window.inner_size();
                (size.width, size.height)
            }
        }
    }
}
