use crate::device::BackendFlags;

/// Frame scheduler configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Simulation step in seconds; every `on_fixed_update` receives exactly this.
    pub fixed_timestep: f64,

    /// Upper clamp on a measured frame delta, in seconds.
    pub max_frame_time: f64,

    /// Upper bound on fixed-update catch-up iterations per frame. Must be non-zero.
    pub max_updates_per_frame: u32,

    pub vsync: bool,

    /// Requests backend validation layers.
    pub debug: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_frame_time: 1.0,
            max_updates_per_frame: 10,
            vsync: true,
            debug: false,
        }
    }
}

impl SchedulerConfig {
    /// Default configuration ticking the simulation `hz` times per second.
    pub fn from_hz(hz: f64) -> Self {
        Self::default().with_fixed_timestep(1.0 / hz)
    }

    pub fn with_fixed_timestep(mut self, seconds: f64) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    pub fn with_max_frame_time(mut self, seconds: f64) -> Self {
        self.max_frame_time = seconds;
        self
    }

    pub fn with_max_updates_per_frame(mut self, n: u32) -> Self {
        self.max_updates_per_frame = n;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn backend_flags(&self) -> BackendFlags {
        BackendFlags {
            vsync: self.vsync,
            debug: self.debug,
        }
    }
}
