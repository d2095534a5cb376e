/// Initialization parameters for `WgpuBackend`.
///
/// Present mode is not configured here: it follows `BackendFlags::vsync`.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Graphics APIs the adapter may come from.
    pub backends: wgpu::Backends,

    /// MSAA sample count. Falls back to 1 if the adapter does not support it
    /// for the chosen surface format.
    pub sample_count: u32,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,

    /// Color the surface is cleared to each frame, as `0xRRGGBBAA`.
    pub clear_color: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            sample_count: 1,
            prefer_srgb: true,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            clear_color: 0x93CC_EAFF,
        }
    }
}

impl GpuInit {
    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn with_msaa(mut self, samples: u32) -> Self {
        self.sample_count = samples.max(1);
        self
    }

    pub fn with_clear_color(mut self, rgba: u32) -> Self {
        self.clear_color = rgba;
        self
    }

    /// `clear_color` unpacked into normalized channels.
    pub fn clear_color_rgba(&self) -> [f64; 4] {
        let channel = |shift: u32| f64::from((self.clear_color >> shift) & 0xFF) / 255.0;
        [channel(24), channel(16), channel(8), channel(0)]
    }
}
