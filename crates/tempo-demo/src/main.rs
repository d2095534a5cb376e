//! Menu, gameplay, and pause overlay driven by the tempo frame scheduler.
//!
//! Enter starts the game, Escape pauses, Escape again resumes, Q in the pause
//! menu returns to the main menu. Closing the window during gameplay asks for
//! a second close. F1 toggles frame statistics, F2 toggles wireframe.

mod draw;
mod states;

use anyhow::Result;
use tempo_engine::core::{FrameScheduler, SchedulerConfig};
use tempo_engine::device::{GpuInit, WgpuBackend};
use tempo_engine::logging::{LoggingConfig, init_logging};
use tempo_engine::state::LayerFlags;
use tempo_engine::window::{WindowConfig, WinitEvents};

use states::MenuState;

fn main() -> Result<()> {
    let config = SchedulerConfig::default();
    init_logging(LoggingConfig::default().verbose(config.debug));

    let window = WindowConfig::new("tempo demo").with_size(1280, 720);
    let (width, height) = (window.width, window.height);

    let events = WinitEvents::new(window)?;
    let backend = WgpuBackend::new(events.window().clone(), GpuInit::default().with_msaa(4));

    let mut scheduler = FrameScheduler::new(config, backend, events);
    scheduler
        .states_mut()
        .push(Box::new(MenuState), LayerFlags::default());

    scheduler.initialize(width, height)?;
    scheduler.run()
}
