use winit::dpi::{LogicalSize, PhysicalSize, Size};
use winit::window::{Fullscreen, Window, WindowAttributes};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width; logical pixels with `high_dpi`, physical otherwise.
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
    pub borderless: bool,
    /// Scale the initial size by the monitor's scale factor.
    pub high_dpi: bool,
    /// Let the compositor blend the window with what is behind it. Pair with a
    /// translucent `GpuInit::clear_color` and a non-opaque alpha mode.
    pub transparent: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "tempo".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
            borderless: false,
            high_dpi: true,
            transparent: false,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_borderless(mut self, borderless: bool) -> Self {
        self.borderless = borderless;
        self
    }

    pub fn with_high_dpi(mut self, high_dpi: bool) -> Self {
        self.high_dpi = high_dpi;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    fn inner_size(&self) -> Size {
        if self.high_dpi {
            LogicalSize::new(self.width, self.height).into()
        } else {
            PhysicalSize::new(self.width, self.height).into()
        }
    }

    pub(crate) fn attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.inner_size())
            .with_transparent(self.transparent)
            .with_resizable(self.resizable)
            .with_decorations(!self.borderless)
            .with_fullscreen(self.fullscreen.then_some(Fullscreen::Borderless(None)))
    }
}
