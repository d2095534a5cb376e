use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use super::config::SchedulerConfig;
use crate::device::{Backend, DebugFlags};
use crate::input::Event;
use crate::state::StateStack;
use crate::time::{DurationExt, SystemClock, TimeSource, elapsed};
use crate::window::EventSource;

/// Largest interpolation factor handed to `on_render`; 1.0 itself would
/// extrapolate into a tick that has not been simulated.
const MAX_INTERPOLATION: f64 = 1.0 - 1e-6;

/// Frames shorter than this yield briefly when presentation is not synced.
const UNSYNCED_IDLE_THRESHOLD: f64 = 1.0 / 240.0;
const UNSYNCED_IDLE_SLEEP: Duration = Duration::from_micros(1);

/// Lifecycle flags of a scheduler.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RunState {
    pub initialized: bool,
    pub running: bool,
    /// Spike-clamped delta of the last frame, in seconds.
    pub last_delta_time: f64,
}

/// Timing outcome of one frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Clamped frame delta in seconds.
    pub delta: f64,
    pub fixed_updates: u32,
    /// Whole ticks discarded because the catch-up cap was hit.
    pub dropped_ticks: u32,
    pub interpolation: f64,
}

/// Fixed-timestep main loop over a `StateStack`.
///
/// Lifecycle: uninitialized, initialized, running, and back to initialized once
/// a quit goes through. All callbacks run on the thread calling `run`.
pub struct FrameScheduler<B, E, T = SystemClock>
where
    B: Backend,
    E: EventSource,
    T: TimeSource,
{
    config: SchedulerConfig,
    backend: B,
    events: E,
    time: T,
    states: StateStack,

    run: RunState,
    accumulator: f64,
    last_tick: Instant,
    event_buf: Vec<Event>,
    last_frame: FrameStats,
    debug: DebugFlags,
}

impl<B, E> FrameScheduler<B, E, SystemClock>
where
    B: Backend,
    E: EventSource,
{
    pub fn new(config: SchedulerConfig, backend: B, events: E) -> Self {
        Self::with_time_source(config, backend, events, SystemClock)
    }
}

impl<B, E, T> FrameScheduler<B, E, T>
where
    B: Backend,
    E: EventSource,
    T: TimeSource,
{
    /// Builds a scheduler measuring frame deltas with `time`.
    ///
    /// A zero `max_updates_per_frame` or a non-positive timestep is a
    /// programming error: it asserts in debug builds and is left as-is in
    /// release, where the simulation simply never ticks.
    pub fn with_time_source(config: SchedulerConfig, backend: B, events: E, time: T) -> Self {
        debug_assert!(config.max_updates_per_frame > 0, "max_updates_per_frame must be non-zero");
        debug_assert!(
            config.fixed_timestep > 0.0 && config.fixed_timestep.is_finite(),
            "fixed_timestep must be positive and finite"
        );

        let last_tick = time.now();

        Self {
            config,
            backend,
            events,
            time,
            states: StateStack::new(),
            run: RunState::default(),
            accumulator: 0.0,
            last_tick,
            event_buf: Vec::new(),
            last_frame: FrameStats::default(),
            debug: DebugFlags::default(),
        }
    }

    /// Initializes the backend. Does nothing if that already succeeded.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.run.initialized {
            return Ok(());
        }

        let caps = match self.backend.initialize(width, height, self.config.backend_flags()) {
            Ok(caps) => caps,
            Err(e) => {
                log::error!("backend initialization failed: {e:#}");
                return Err(e).context("failed to initialize backend");
            }
        };

        log::info!(
            "backend initialized: {} (max texture size {})",
            caps.renderer,
            caps.max_texture_size
        );
        self.run.initialized = true;
        self.backend.set_debug(self.debug);

        Ok(())
    }

    /// Enters the running state without looping, for hosts that call
    /// `run_frame` themselves.
    ///
    /// Returns `false` (and logs) when the backend is not initialized or the
    /// scheduler is already running.
    pub fn start(&mut self) -> bool {
        if !self.run.initialized {
            log::error!("cannot run: backend not initialized");
            return false;
        }
        if self.run.running {
            log::warn!("cannot run: frame loop already running");
            return false;
        }

        self.run.running = true;
        self.accumulator = 0.0;
        self.last_tick = self.time.now();

        log::info!(
            "frame loop started (fixed step {:.3} ms, vsync {})",
            self.config.fixed_timestep * 1000.0,
            self.config.vsync
        );
        true
    }

    /// Runs frames until a quit goes through.
    ///
    /// Precondition violations are logged and return `Ok` without looping.
    /// A fatal presentation error stops the loop and is returned.
    pub fn run(&mut self) -> Result<()> {
        if !self.start() {
            return Ok(());
        }

        while self.run.running {
            self.run_frame()?;
        }

        log::info!("frame loop stopped");
        Ok(())
    }

    /// Executes one loop iteration.
    ///
    /// Requires a successful `start` (or a `run` in progress). Otherwise the
    /// call is logged and returns empty stats without touching states or the
    /// backend.
    pub fn run_frame(&mut self) -> Result<FrameStats> {
        if !self.run.running {
            log::warn!("run_frame called while the frame loop is not running");
            return Ok(FrameStats::default());
        }

        self.states.on_enter_frame();

        self.dispatch_events();

        let now = self.time.now();
        let raw_delta = elapsed(self.last_tick, now).secs_f64();
        self.last_tick = now;

        let stats = self.advance(raw_delta);

        self.states.on_exit_frame();
        self.apply_debug_toggles();

        if self.states.take_quit_request() {
            self.quit();
        }

        self.present()?;

        if !self.config.vsync && stats.delta < UNSYNCED_IDLE_THRESHOLD {
            std::thread::sleep(UNSYNCED_IDLE_SLEEP);
        }

        Ok(stats)
    }

    /// Feeds `raw_delta` seconds through the accumulator: fixed updates,
    /// one variable update, one render into the backend's frame.
    pub fn advance(&mut self, raw_delta: f64) -> FrameStats {
        let fixed = self.config.fixed_timestep;

        // `max` also maps NaN to zero.
        let delta = raw_delta.max(0.0).min(self.config.max_frame_time);
        self.run.last_delta_time = delta;
        self.accumulator += delta;

        let mut fixed_updates = 0;
        while self.accumulator >= fixed && fixed_updates < self.config.max_updates_per_frame {
            self.accumulator -= fixed;
            fixed_updates += 1;
            self.states.on_fixed_update(fixed);
        }

        let mut dropped_ticks = 0;
        if self.accumulator >= fixed {
            let remainder = self.accumulator % fixed;
            dropped_ticks = ((self.accumulator - remainder) / fixed).round() as u32;
            self.accumulator = remainder;
            log::trace!("simulation overloaded: dropped {dropped_ticks} fixed ticks");
        }

        self.states.on_update(delta);

        let interpolation = interpolation(self.accumulator, fixed);
        let mut frame = self.backend.frame();
        frame.debug = self.debug;
        self.states.on_render(&mut frame, interpolation);
        drop(frame);

        let stats = FrameStats {
            delta,
            fixed_updates,
            dropped_ticks,
            interpolation,
        };
        self.last_frame = stats;
        stats
    }

    /// Stops the loop unless an active state vetoes. No-op when not running.
    pub fn quit(&mut self) {
        if !self.run.running {
            return;
        }

        if self.states.on_quit_requested() {
            self.run.running = false;
            log::info!("quit requested");
        } else {
            log::debug!("quit vetoed by an active state");
        }
    }

    /// Flips the frame statistics overlay.
    pub fn toggle_debug(&mut self) {
        self.debug.stats = !self.debug.stats;
        self.push_debug();
    }

    /// Flips wireframe rendering.
    pub fn toggle_wireframe(&mut self) {
        self.debug.wireframe = !self.debug.wireframe;
        self.push_debug();
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    fn apply_debug_toggles(&mut self) {
        let (stats, wireframe) = self.states.take_debug_toggles();
        if stats {
            self.toggle_debug();
        }
        if wireframe {
            self.toggle_wireframe();
        }
    }

    fn push_debug(&mut self) {
        log::debug!("debug flags now {:?}", self.debug);
        if self.run.initialized {
            self.backend.set_debug(self.debug);
        }
    }

    fn dispatch_events(&mut self) {
        let mut events = std::mem::take(&mut self.event_buf);
        self.events.poll(&mut events);

        for event in events.drain(..) {
            match event {
                Event::Quit => self.quit(),
                Event::Resized { width, height } => {
                    log::debug!("resize to {width}x{height}");
                    self.backend.resize(width, height);
                    self.states.on_event(&event);
                }
                _ => self.states.on_event(&event),
            }
        }

        self.event_buf = events;
    }

    fn present(&mut self) -> Result<()> {
        match self.backend.present_frame() {
            Ok(()) => Ok(()),
            Err(action) if action.is_fatal() => {
                self.run.running = false;
                log::error!("{action}, stopping frame loop");
                bail!(action)
            }
            Err(action) => {
                log::debug!("frame not presented: {action}");
                Ok(())
            }
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn is_initialized(&self) -> bool {
        self.run.initialized
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    pub fn last_delta_time(&self) -> f64 {
        self.run.last_delta_time
    }

    /// Frames per second implied by the last delta; zero before the first frame.
    pub fn current_fps(&self) -> f64 {
        if self.run.last_delta_time > 0.0 {
            1.0 / self.run.last_delta_time
        } else {
            0.0
        }
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    pub fn states(&self) -> &StateStack {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut StateStack {
        &mut self.states
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn back_buffer_size(&self) -> (u32, u32) {
        self.backend.size()
    }
}

impl<B, E, T> Drop for FrameScheduler<B, E, T>
where
    B: Backend,
    E: EventSource,
    T: TimeSource,
{
    fn drop(&mut self) {
        if self.run.initialized {
            self.backend.shutdown();
        }
    }
}

fn interpolation(accumulator: f64, fixed_timestep: f64) -> f64 {
    if accumulator > 0.0 {
        (accumulator / fixed_timestep).min(MAX_INTERPOLATION)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::device::{BackendCaps, BackendFlags, RenderFrame, SurfaceErrorAction};
    use crate::input::{Key, KeyInput};
    use crate::state::{LayerFlags, State, StateCtx};
    use crate::time::ManualTime;

    const STEP: f64 = 1.0 / 60.0;

    // ── doubles ──

    #[derive(Default)]
    struct BackendLog {
        inits: Cell<u32>,
        shutdowns: Cell<u32>,
        presents: Cell<u32>,
        frames: Cell<u32>,
        resizes: RefCell<Vec<(u32, u32)>>,
        debug: RefCell<Vec<DebugFlags>>,
    }

    struct FakeBackend {
        log: Rc<BackendLog>,
        fail_init: bool,
        present_error: Option<SurfaceErrorAction>,
    }

    impl FakeBackend {
        fn new(log: &Rc<BackendLog>) -> Self {
            Self {
                log: log.clone(),
                fail_init: false,
                present_error: None,
            }
        }
    }

    impl Backend for FakeBackend {
        fn initialize(&mut self, _w: u32, _h: u32, _flags: BackendFlags) -> anyhow::Result<BackendCaps> {
            self.log.inits.set(self.log.inits.get() + 1);
            if self.fail_init {
                bail!("no adapter");
            }
            Ok(BackendCaps {
                renderer: "fake".to_string(),
                max_texture_size: 4096,
            })
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.log.resizes.borrow_mut().push((width, height));
        }

        fn frame(&mut self) -> RenderFrame<'_> {
            self.log.frames.set(self.log.frames.get() + 1);
            RenderFrame::headless(self.size())
        }

        fn set_debug(&mut self, flags: DebugFlags) {
            self.log.debug.borrow_mut().push(flags);
        }

        fn present_frame(&mut self) -> std::result::Result<(), SurfaceErrorAction> {
            self.log.presents.set(self.log.presents.get() + 1);
            self.present_error.map_or(Ok(()), Err)
        }

        fn shutdown(&mut self) {
            self.log.shutdowns.set(self.log.shutdowns.get() + 1);
        }

        fn size(&self) -> (u32, u32) {
            (800, 600)
        }
    }

    /// Yields one scripted batch per poll; empty once exhausted.
    #[derive(Default)]
    struct Script {
        frames: VecDeque<Vec<Event>>,
        polls: Rc<Cell<u32>>,
    }

    impl Script {
        fn new(frames: Vec<Vec<Event>>) -> Self {
            Self {
                frames: frames.into(),
                polls: Rc::default(),
            }
        }
    }

    impl EventSource for Script {
        fn poll(&mut self, out: &mut Vec<Event>) {
            self.polls.set(self.polls.get() + 1);
            if let Some(batch) = self.frames.pop_front() {
                out.extend(batch);
            }
        }
    }

    #[derive(Debug, Default)]
    struct Counts {
        fixed: u32,
        updates: Vec<f64>,
        renders: Vec<f64>,
        events: Vec<Event>,
        quit_asks: u32,
        wireframe_seen: Vec<bool>,
    }

    struct Counter {
        counts: Rc<RefCell<Counts>>,
        allow_quit: bool,
        quit_on_update: bool,
    }

    impl Counter {
        fn new(counts: &Rc<RefCell<Counts>>) -> Self {
            Self {
                counts: counts.clone(),
                allow_quit: true,
                quit_on_update: false,
            }
        }
    }

    impl State for Counter {
        fn on_quit_requested(&mut self, _ctx: &mut StateCtx) -> bool {
            self.counts.borrow_mut().quit_asks += 1;
            self.allow_quit
        }

        fn on_event(&mut self, _ctx: &mut StateCtx, event: &Event) {
            self.counts.borrow_mut().events.push(event.clone());
        }

        fn on_fixed_update(&mut self, _ctx: &mut StateCtx, dt: f64) {
            assert_relative_eq!(dt, STEP);
            self.counts.borrow_mut().fixed += 1;
        }

        fn on_update(&mut self, ctx: &mut StateCtx, dt: f64) {
            self.counts.borrow_mut().updates.push(dt);
            if self.quit_on_update {
                ctx.request_quit();
            }
        }

        fn on_render(&mut self, _ctx: &mut StateCtx, frame: &mut RenderFrame<'_>, interpolation: f64) {
            assert!(frame.is_headless());
            let mut counts = self.counts.borrow_mut();
            counts.renders.push(interpolation);
            counts.wireframe_seen.push(frame.debug.wireframe);
        }
    }

    /// Runs `f` for every event and ignores everything else.
    struct OnEvent<F>(F);

    impl<F: FnMut(&mut StateCtx, &Event)> State for OnEvent<F> {
        fn on_event(&mut self, ctx: &mut StateCtx, event: &Event) {
            (self.0)(ctx, event);
        }

        fn on_fixed_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

        fn on_update(&mut self, _ctx: &mut StateCtx, _dt: f64) {}

        fn on_render(&mut self, _ctx: &mut StateCtx, _frame: &mut RenderFrame<'_>, _interpolation: f64) {}
    }

    struct Harness {
        sched: FrameScheduler<FakeBackend, Script, ManualTime>,
        time: ManualTime,
        backend: Rc<BackendLog>,
        counts: Rc<RefCell<Counts>>,
    }

    fn harness(frames: Vec<Vec<Event>>, state: impl FnOnce(Counter) -> Counter) -> Harness {
        let backend = Rc::new(BackendLog::default());
        let counts = Rc::new(RefCell::new(Counts::default()));
        let time = ManualTime::new();

        let mut sched = FrameScheduler::with_time_source(
            SchedulerConfig::default(),
            FakeBackend::new(&backend),
            Script::new(frames),
            time.clone(),
        );
        sched
            .states_mut()
            .push(Box::new(state(Counter::new(&counts))), LayerFlags::default());

        Harness {
            sched,
            time,
            backend,
            counts,
        }
    }

    fn started(frames: Vec<Vec<Event>>) -> Harness {
        let mut h = harness(frames, |c| c);
        h.sched.initialize(800, 600).unwrap();
        assert!(h.sched.start());
        h
    }

    // ── accumulator ──

    #[test]
    fn fixed_step_is_deterministic_for_a_given_delta() {
        let mut h = started(vec![]);

        h.time.advance_secs(0.05);
        let stats = h.sched.run_frame().unwrap();

        assert_eq!(stats.fixed_updates, 3);
        assert_eq!(h.counts.borrow().fixed, 3);
        assert!((0.0..1.0).contains(&stats.interpolation));
        assert_abs_diff_eq!(stats.interpolation, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(h.counts.borrow().renders[0], stats.interpolation);
    }

    #[test]
    fn leftover_time_carries_into_the_next_frame() {
        let mut h = started(vec![]);

        let first = h.sched.advance(0.01);
        assert_eq!(first.fixed_updates, 0);
        assert_relative_eq!(first.interpolation, 0.6, epsilon = 1e-9);

        let second = h.sched.advance(0.01);
        assert_eq!(second.fixed_updates, 1);
        assert_relative_eq!(second.interpolation, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn spike_is_clamped_to_max_frame_time() {
        let mut h = started(vec![]);

        let stats = h.sched.advance(10.0);

        assert_eq!(stats.delta, 1.0);
        assert_eq!(h.sched.last_delta_time(), 1.0);
        assert_eq!(h.counts.borrow().updates, vec![1.0]);
    }

    #[test]
    fn catch_up_is_capped_and_excess_discarded() {
        let mut h = started(vec![]);

        let stats = h.sched.advance(1.0);

        assert_eq!(stats.fixed_updates, 10);
        assert_eq!(h.counts.borrow().fixed, 10);
        assert!(stats.dropped_ticks > 0);
        assert!(h.sched.accumulator < STEP);
        assert!(stats.interpolation < 1.0);

        // Next frame starts from the truncated remainder, not 50 pending ticks.
        let next = h.sched.advance(0.0);
        assert!(next.fixed_updates <= 1);
    }

    #[test]
    fn negative_or_nan_delta_counts_as_zero() {
        let mut h = started(vec![]);

        assert_eq!(h.sched.advance(-0.5).delta, 0.0);
        assert_eq!(h.sched.advance(f64::NAN).delta, 0.0);
        assert_eq!(h.counts.borrow().fixed, 0);
    }

    #[test]
    fn interpolation_never_reaches_one() {
        assert_eq!(interpolation(0.0, STEP), 0.0);
        assert!(interpolation(STEP * (1.0 - 1e-12), STEP) < 1.0);
        assert_relative_eq!(interpolation(STEP / 2.0, STEP), 0.5);
    }

    #[test]
    fn update_and_render_run_once_per_frame() {
        let mut h = started(vec![]);

        for _ in 0..4 {
            h.time.advance_secs(0.004);
            h.sched.run_frame().unwrap();
        }

        let counts = h.counts.borrow();
        assert_eq!(counts.updates.len(), 4);
        assert_eq!(counts.renders.len(), 4);
        assert_eq!(h.backend.presents.get(), 4);
    }

    #[test]
    fn fps_tracks_last_delta() {
        let mut h = started(vec![]);
        assert_eq!(h.sched.current_fps(), 0.0);

        h.sched.advance(0.02);
        assert_relative_eq!(h.sched.current_fps(), 50.0, epsilon = 1e-9);
    }

    // ── lifecycle ──

    #[test]
    fn initialize_is_idempotent() {
        let mut h = harness(vec![], |c| c);

        h.sched.initialize(800, 600).unwrap();
        h.sched.initialize(800, 600).unwrap();

        assert!(h.sched.is_initialized());
        assert_eq!(h.backend.inits.get(), 1);
    }

    #[test]
    fn failed_initialize_blocks_run() {
        let backend = Rc::new(BackendLog::default());
        let events = Script::new(vec![]);
        let polls = events.polls.clone();

        let mut failing = FakeBackend::new(&backend);
        failing.fail_init = true;
        let mut sched = FrameScheduler::with_time_source(
            SchedulerConfig::default(),
            failing,
            events,
            ManualTime::new(),
        );

        assert!(sched.initialize(800, 600).is_err());
        assert!(!sched.is_initialized());

        sched.run().unwrap();
        assert_eq!(polls.get(), 0);
        assert!(!sched.is_running());
    }

    #[test]
    fn run_before_initialize_returns_without_looping() {
        let mut h = harness(vec![], |c| c);
        let polls = h.sched.events.polls.clone();

        h.sched.run().unwrap();

        assert_eq!(polls.get(), 0);
        assert_eq!(h.backend.presents.get(), 0);
    }

    #[test]
    fn run_frame_before_start_does_nothing() {
        let mut h = harness(vec![vec![Event::Quit]], |c| c);
        h.sched.initialize(800, 600).unwrap();
        let polls = h.sched.events.polls.clone();

        h.time.advance_secs(0.05);
        let stats = h.sched.run_frame().unwrap();

        assert_eq!(stats, FrameStats::default());
        assert_eq!(polls.get(), 0);
        assert_eq!(h.backend.presents.get(), 0);
        assert_eq!(h.backend.frames.get(), 0);
        assert!(h.counts.borrow().updates.is_empty());
        assert!(h.sched.states().is_empty());
    }

    #[test]
    fn start_rejects_reentry() {
        let mut h = started(vec![]);
        assert!(!h.sched.start());
        assert!(h.sched.is_running());
    }

    #[test]
    fn run_loops_until_platform_quit() {
        let mut h = harness(vec![vec![], vec![], vec![Event::Quit]], |c| c);
        h.sched.initialize(800, 600).unwrap();

        h.sched.run().unwrap();

        assert!(!h.sched.is_running());
        assert!(h.sched.is_initialized());
        assert_eq!(h.backend.presents.get(), 3);
        assert_eq!(h.counts.borrow().quit_asks, 1);
    }

    #[test]
    fn drop_shuts_down_initialized_backend_once() {
        let h = started(vec![]);
        let backend = h.backend.clone();
        drop(h);
        assert_eq!(backend.shutdowns.get(), 1);

        let h = harness(vec![], |c| c);
        let backend = h.backend.clone();
        drop(h);
        assert_eq!(backend.shutdowns.get(), 0);
    }

    // ── quit ──

    #[test]
    fn vetoed_quit_keeps_running() {
        let mut h = harness(vec![vec![Event::Quit]], |mut c| {
            c.allow_quit = false;
            c
        });
        h.sched.initialize(800, 600).unwrap();
        assert!(h.sched.start());

        h.sched.run_frame().unwrap();

        assert!(h.sched.is_running());
        assert_eq!(h.counts.borrow().quit_asks, 1);
        assert!(h.counts.borrow().events.is_empty());
    }

    #[test]
    fn quit_when_not_running_is_a_no_op() {
        let mut h = harness(vec![], |c| c);
        h.sched.quit();
        assert_eq!(h.counts.borrow().quit_asks, 0);
    }

    #[test]
    fn state_requested_quit_applies_at_end_of_frame() {
        let mut h = harness(vec![], |mut c| {
            c.quit_on_update = true;
            c
        });
        h.sched.initialize(800, 600).unwrap();
        assert!(h.sched.start());

        h.sched.run_frame().unwrap();

        assert!(!h.sched.is_running());
        assert_eq!(h.counts.borrow().renders.len(), 1);
        assert_eq!(h.backend.presents.get(), 1);
    }

    #[test]
    fn empty_stack_keeps_running() {
        let mut h = started(vec![]);
        h.sched.states_mut().clear();

        h.sched.run_frame().unwrap();
        h.sched.run_frame().unwrap();

        assert!(h.sched.states().is_empty());
        assert!(h.sched.is_running());
    }

    // ── events ──

    #[test]
    fn resize_reaches_backend_and_states() {
        let resized = Event::Resized {
            width: 640,
            height: 480,
        };
        let mut h = started(vec![vec![resized.clone()]]);

        h.sched.run_frame().unwrap();

        assert_eq!(*h.backend.resizes.borrow(), vec![(640, 480)]);
        assert_eq!(h.counts.borrow().events, vec![resized]);
        assert_eq!(h.sched.back_buffer_size(), (800, 600));
    }

    #[test]
    fn input_events_are_forwarded_in_order() {
        let key = |c| Event::from(KeyInput::pressed(Key::Char(c)));
        let mut h = started(vec![vec![key('a'), key('b')]]);

        h.sched.run_frame().unwrap();

        assert_eq!(h.counts.borrow().events, vec![key('a'), key('b')]);
    }

    #[test]
    fn layer_pushed_from_event_starts_next_frame() {
        let key = Event::from(KeyInput::pressed(Key::Enter));
        let mut h = started(vec![vec![key.clone()]]);
        let pushed = Rc::new(RefCell::new(Counts::default()));

        let inner = pushed.clone();
        h.sched.states_mut().push(
            Box::new(OnEvent(move |ctx: &mut StateCtx, event: &Event| {
                if event.key_pressed() == Some(Key::Enter) {
                    ctx.push(Box::new(Counter::new(&inner)), LayerFlags::default());
                }
            })),
            LayerFlags::modal(false),
        );

        h.time.advance_secs(0.05);
        h.sched.run_frame().unwrap();

        {
            let counts = pushed.borrow();
            assert_eq!(counts.fixed, 0);
            assert!(counts.updates.is_empty());
            assert!(counts.renders.is_empty());
            assert!(counts.events.is_empty());
        }
        assert_eq!(h.sched.states().len(), 3);

        h.time.advance_secs(0.05);
        let stats = h.sched.run_frame().unwrap();

        let counts = pushed.borrow();
        assert_eq!(stats.fixed_updates, 3);
        assert_eq!(counts.fixed, 3);
        assert_eq!(counts.updates.len(), 1);
        assert_eq!(counts.renders.len(), 1);
    }

    // ── debug toggles ──

    #[test]
    fn state_toggles_apply_after_the_frame() {
        let mut h = started(vec![vec![Event::from(KeyInput::pressed(Key::F(2)))]]);
        h.sched.states_mut().push(
            Box::new(OnEvent(|ctx: &mut StateCtx, event: &Event| {
                if event.key_pressed() == Some(Key::F(2)) {
                    ctx.toggle_wireframe();
                }
            })),
            LayerFlags::modal(false),
        );
        h.sched.states_mut().push(Box::new(Counter::new(&h.counts)), LayerFlags::default());

        h.sched.run_frame().unwrap();
        assert!(h.sched.debug_flags().wireframe);
        assert!(!h.sched.debug_flags().stats);

        h.sched.run_frame().unwrap();

        // The first render still saw the old flags.
        assert_eq!(h.counts.borrow().wireframe_seen, vec![false, true]);
        let pushed = h.backend.debug.borrow();
        assert_eq!(pushed.len(), 2);
        assert!(pushed[1].wireframe);
    }

    #[test]
    fn toggles_before_initialize_reach_backend_on_init() {
        let mut h = harness(vec![], |c| c);
        h.sched.toggle_debug();
        h.sched.toggle_wireframe();
        h.sched.toggle_wireframe();
        assert!(h.backend.debug.borrow().is_empty());

        h.sched.initialize(800, 600).unwrap();

        let expected = DebugFlags {
            stats: true,
            wireframe: false,
        };
        assert_eq!(*h.backend.debug.borrow(), vec![expected]);
    }

    // ── presentation ──

    #[test]
    fn recoverable_surface_errors_are_ignored() {
        let mut h = started(vec![]);
        h.sched.backend.present_error = Some(SurfaceErrorAction::SkipFrame);

        h.sched.run_frame().unwrap();
        assert!(h.sched.is_running());

        h.sched.backend.present_error = Some(SurfaceErrorAction::Reconfigured);
        h.sched.run_frame().unwrap();
        assert!(h.sched.is_running());
    }

    #[test]
    fn fatal_surface_error_ends_run() {
        let mut h = harness(vec![], |c| c);
        h.sched.backend.present_error = Some(SurfaceErrorAction::Fatal);
        h.sched.initialize(800, 600).unwrap();

        assert!(h.sched.run().is_err());
        assert!(!h.sched.is_running());
        assert_eq!(h.backend.presents.get(), 1);
    }
}
