use tempo_engine::device::RenderFrame;
use tempo_engine::input::{Event, Key};
use tempo_engine::state::{LayerFlags, State, StateCtx};
use tempo_engine::time::Clock;

use crate::draw::{PixelRect, RectPainter};

/// Simulated units per second.
const PLAYER_SPEED: f64 = 120.0;
const ARENA_WIDTH: f64 = 640.0;
/// Player edge length in physical pixels.
const PLAYER_SIZE: f32 = 48.0;

/// F1/F2 flip the debug views from any state that sees the key.
fn debug_keys(ctx: &mut StateCtx, key: Option<Key>) {
    match key {
        Some(Key::F(1)) => ctx.toggle_debug(),
        Some(Key::F(2)) => ctx.toggle_wireframe(),
        _ => {}
    }
}

// ── menu ──

pub struct MenuState;

impl State for MenuState {
    fn on_enter(&mut self, _ctx: &mut StateCtx) {
        log::info!("menu: press Enter to play, Escape to quit");
    }

    fn on_event(&mut self, ctx: &mut StateCtx, event: &Event) {
        match event.key_pressed() {
            Some(Key::Enter) => {
                ctx.replace_top(Box::new(GameplayState::default()), LayerFlags::default());
            }
            Some(Key::Escape) => ctx.request_quit(),
            key => debug_keys(ctx, key),
        }
    }

    fn on_fixed_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

    fn on_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

    fn on_render(&mut self, _ctx: &mut StateCtx, _frame: &mut RenderFrame<'_>, _interpolation: f64) {}
}

// ── gameplay ──

/// A player bouncing across the arena at a fixed simulation rate.
#[derive(Default)]
pub struct GameplayState {
    ticks: u64,
    position: f64,
    previous: f64,
    direction: f64,
    close_armed: bool,
    session: Clock,
    painter: RectPainter,
}

impl GameplayState {
    /// Position blended between the last two simulated ticks.
    fn render_position(&self, interpolation: f64) -> f64 {
        self.previous + (self.position - self.previous) * interpolation
    }

    /// Player square for a `width` x `height` target, vertically centered.
    fn player_rect(&self, (width, height): (u32, u32), interpolation: f64) -> PixelRect {
        let travel = (width as f32 - PLAYER_SIZE).max(0.0);
        let t = (self.render_position(interpolation) / ARENA_WIDTH) as f32;
        PixelRect {
            x: t * travel,
            y: (height as f32 - PLAYER_SIZE) / 2.0,
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
        }
    }
}

impl State for GameplayState {
    fn on_enter(&mut self, _ctx: &mut StateCtx) {
        self.direction = 1.0;
        self.session.start();
        log::info!("gameplay: Escape pauses");
    }

    fn on_exit(&mut self, _ctx: &mut StateCtx) {
        self.session.stop();
        log::info!(
            "gameplay ended after {} ticks ({:.1} s wall time)",
            self.ticks,
            self.session.elapsed_seconds()
        );
    }

    fn on_quit_requested(&mut self, _ctx: &mut StateCtx) -> bool {
        if self.close_armed {
            return true;
        }
        self.close_armed = true;
        log::warn!("game in progress, press close again to quit");
        false
    }

    fn on_event(&mut self, ctx: &mut StateCtx, event: &Event) {
        match event.key_pressed() {
            Some(Key::Escape) => ctx.push_modal(Box::new(PauseState), true),
            key => debug_keys(ctx, key),
        }
    }

    fn on_fixed_update(&mut self, _ctx: &mut StateCtx, dt: f64) {
        self.ticks += 1;
        self.previous = self.position;
        self.position += self.direction * PLAYER_SPEED * dt;

        if !(0.0..=ARENA_WIDTH).contains(&self.position) {
            self.position = self.position.clamp(0.0, ARENA_WIDTH);
            self.direction = -self.direction;
        }
    }

    fn on_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

    fn on_render(&mut self, _ctx: &mut StateCtx, frame: &mut RenderFrame<'_>, interpolation: f64) {
        let rect = self.player_rect(frame.size, interpolation);
        if frame.debug.stats && self.ticks % 60 == 0 {
            log::debug!(
                "player at {:.1} ({:.0}, {:.0})",
                self.render_position(interpolation),
                rect.x,
                rect.y
            );
        }

        let size = frame.size;
        let wireframe = frame.debug.wireframe;
        let Some(gpu) = frame.gpu() else {
            return;
        };
        if wireframe {
            self.painter.draw(gpu, size, &rect.outline(2.0));
        } else {
            self.painter.draw(gpu, size, &[rect]);
        }
    }
}

// ── pause ──

/// Modal overlay: freezes the game below while it stays visible.
pub struct PauseState;

impl State for PauseState {
    fn on_enter(&mut self, _ctx: &mut StateCtx) {
        log::info!("paused: Escape resumes, Q returns to menu");
    }

    fn on_event(&mut self, ctx: &mut StateCtx, event: &Event) {
        match event.key_pressed() {
            Some(Key::Escape) => ctx.pop(),
            Some(Key::Char('q')) => {
                ctx.clear();
                ctx.push(Box::new(MenuState), LayerFlags::default());
            }
            key => debug_keys(ctx, key),
        }
    }

    fn on_fixed_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

    fn on_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

    fn on_render(&mut self, _ctx: &mut StateCtx, _frame: &mut RenderFrame<'_>, _interpolation: f64) {}
}
