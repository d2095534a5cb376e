use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::config::WindowConfig;
use super::source::EventSource;
use super::translate::{PointerTracker, WindowView, translate};
use crate::input::Event;

/// Receives winit callbacks while the loop is being pumped.
struct PumpHandler {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,
    tracker: PointerTracker,
    queue: Vec<Event>,
}

impl ApplicationHandler for PumpHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.config.attributes()) {
            Ok(window) => {
                log::info!(
                    "window created: \"{}\" {}x{}",
                    self.config.title,
                    window.inner_size().width,
                    window.inner_size().height
                );
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                self.create_error = Some(anyhow!(e).context("failed to create window"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_deref() else {
            return;
        };

        if let Some(ev) = translate(WindowView::of(window), &mut self.tracker, &event) {
            self.queue.push(ev);
        }
    }
}

/// `EventSource` backed by a single winit window.
///
/// The event loop is pumped with a zero timeout on every `poll`, so it never
/// blocks the frame. Once winit reports exit, a final `Event::Quit` is emitted
/// and the loop is not pumped again.
pub struct WinitEvents {
    event_loop: EventLoop<()>,
    handler: PumpHandler,
    window: Arc<Window>,
    exited: bool,
}

impl WinitEvents {
    /// Creates the event loop and pumps it until the window exists.
    pub fn new(config: WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut handler = PumpHandler {
            config,
            window: None,
            create_error: None,
            tracker: PointerTracker::default(),
            queue: Vec::new(),
        };

        let window = loop {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(16)), &mut handler);

            if let Some(err) = handler.create_error.take() {
                return Err(err);
            }
            if let Some(window) = handler.window.clone() {
                break window;
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {code} before a window was created");
            }
        };

        // Startup events (initial resize, focus) are delivered on the first poll.
        Ok(Self {
            event_loop,
            handler,
            window,
            exited: false,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl EventSource for WinitEvents {
    fn poll(&mut self, out: &mut Vec<Event>) {
        if self.exited {
            return;
        }

        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        out.append(&mut self.handler.queue);

        if let PumpStatus::Exit(code) = status {
            log::debug!("winit event loop exited with code {code}");
            self.exited = true;
            out.push(Event::Quit);
        }
    }
}
