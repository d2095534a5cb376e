use tempo_engine::device::GpuFrame;

/// Axis-aligned rectangle in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    /// Clipped to a `width` x `height` target; `None` when nothing is left.
    pub fn clipped(self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.w).min(width as f32);
        let y1 = (self.y + self.h).min(height as f32);
        (x1 > x0 && y1 > y0).then_some(Self {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        })
    }

    /// Four `thickness`-wide bands along the edges.
    pub fn outline(self, thickness: f32) -> [Self; 4] {
        let t = thickness.min(self.w / 2.0).min(self.h / 2.0);
        [
            Self { h: t, ..self },
            Self {
                y: self.y + self.h - t,
                h: t,
                ..self
            },
            Self { w: t, ..self },
            Self {
                x: self.x + self.w - t,
                w: t,
                ..self
            },
        ]
    }
}

/// Solid-color rectangles drawn by moving the viewport over a covering triangle.
#[derive(Default)]
pub struct RectPainter {
    pipeline_key: Option<(wgpu::TextureFormat, u32)>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl RectPainter {
    pub fn draw(&mut self, gpu: &mut GpuFrame<'_>, size: (u32, u32), rects: &[PixelRect]) {
        let rects: Vec<PixelRect> = rects.iter().filter_map(|r| r.clipped(size.0, size.1)).collect();
        if rects.is_empty() {
            return;
        }

        self.ensure_pipeline(gpu);
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("demo rect encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("demo rect pass"),
                color_attachments: &[Some(gpu.color_attachment(wgpu::LoadOp::Load))],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            for r in &rects {
                rpass.set_viewport(r.x, r.y, r.w, r.h, 0.0, 1.0);
                rpass.draw(0..3, 0..1);
            }
        }

        gpu.submit(encoder.finish());
    }

    fn ensure_pipeline(&mut self, gpu: &GpuFrame<'_>) {
        let key = (gpu.format, gpu.sample_count);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("demo rect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rect.wgsl").into()),
        });

        let layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("demo rect pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("demo rect pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: gpu.sample_count,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        });

        log::debug!("demo rect pipeline built for {:?} x{}", key.0, key.1);
        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
    }
}
