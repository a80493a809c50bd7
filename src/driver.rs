//! Scene controller and frame loop
//!
//! `Scene` owns everything that lives as long as the pond is on screen: the
//! entity state, the random source, the deferred task registry and the paint
//! options. `FrameDriver` pairs a scene with a drawing surface and runs one
//! simulation tick plus one paint per frame until stopped.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::renderer::{Frame, PaintOptions, RenderState, paint_frame};
use crate::settings::Settings;
use crate::sim::{
    ClickOutcome, DeferredTask, PondState, SceneRng, TimerRegistry, handle_click, seeded, tick,
};

/// Failures while bringing up the drawing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    NoWindow,
    NoCanvas,
    Surface(String),
    NoAdapter,
    Device(String),
    NoSurfaceFormat,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NoWindow => write!(f, "no browser window"),
            SetupError::NoCanvas => write!(f, "no #canvas element"),
            SetupError::Surface(e) => write!(f, "cannot create drawing surface: {e}"),
            SetupError::NoAdapter => write!(f, "no compatible GPU adapter"),
            SetupError::Device(e) => write!(f, "cannot create GPU device: {e}"),
            SetupError::NoSurfaceFormat => write!(f, "surface reports no formats"),
        }
    }
}

impl std::error::Error for SetupError {}

// === Frame sources ===

/// Yields frame timestamps (ms) until exhausted
pub trait TickSource {
    fn next_frame(&mut self) -> Option<f64>;
}

/// A bounded run of frames at a fixed interval
#[derive(Debug, Clone)]
pub struct FixedRateTicks {
    now_ms: f64,
    interval_ms: f64,
    remaining: u64,
}

impl FixedRateTicks {
    pub fn new(start_ms: f64, interval_ms: f64, frames: u64) -> Self {
        Self {
            now_ms: start_ms,
            interval_ms,
            remaining: frames,
        }
    }

    /// Display refresh at 60 Hz
    pub fn sixty_hz(frames: u64) -> Self {
        Self::new(0.0, 1000.0 / 60.0, frames)
    }
}

impl TickSource for FixedRateTicks {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let now = self.now_ms;
        self.now_ms += self.interval_ms;
        Some(now)
    }
}

/// Shared cancel flag for a running loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

// === Surfaces ===

/// Where painted frames go
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn present(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError>;
    /// Rebuild after the surface was lost or went stale
    fn recover(&mut self) {}
}

impl DrawSurface for RenderState {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        RenderState::resize(self, width, height);
    }

    fn present(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        self.render(&frame.vertices)
    }

    fn recover(&mut self) {
        self.reconfigure();
    }
}

/// Keeps the last frame in memory instead of drawing it
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    size: (u32, u32),
    last: Option<Frame>,
    presented: u64,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DrawSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn present(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        self.last = Some(frame.clone());
        self.presented += 1;
        Ok(())
    }
}

// === Scene ===

/// The pond plus everything that lives and dies with it
pub struct Scene {
    state: PondState,
    rng: Box<dyn SceneRng>,
    timers: TimerRegistry<DeferredTask>,
    options: PaintOptions,
}

impl Scene {
    /// Seeded scene
    pub fn new(settings: &Settings, viewport: Vec2, seed: u64) -> Self {
        Self::with_rng(settings, viewport, Box::new(seeded(seed)))
    }

    /// Scene drawing randomness from `rng`
    pub fn with_rng(settings: &Settings, viewport: Vec2, mut rng: Box<dyn SceneRng>) -> Self {
        let state = PondState::new(viewport, settings.fish_count, rng.as_mut());
        Self {
            state,
            rng,
            timers: TimerRegistry::new(),
            options: PaintOptions::from_settings(settings),
        }
    }

    pub fn state(&self) -> &PondState {
        &self.state
    }

    pub fn options(&self) -> &PaintOptions {
        &self.options
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Fire due deferred work, advance one tick and paint
    pub fn frame(&mut self, now_ms: f64) -> Frame {
        for task in self.timers.take_due(now_ms) {
            log::debug!("Running {task:?}");
            task.run(&mut self.state, self.rng.as_mut());
        }
        tick(&mut self.state, self.rng.as_mut());
        paint_frame(&self.state, now_ms / 1000.0, &self.options)
    }

    pub fn click(&mut self, pos: Vec2, now_ms: f64) -> ClickOutcome {
        handle_click(
            &mut self.state,
            pos,
            now_ms,
            self.rng.as_mut(),
            &mut self.timers,
        )
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.resize(Vec2::new(width as f32, height as f32));
    }

    /// Adopt the surface size before the first frame. Fish spawned for a
    /// provisional viewport are spread over the real one.
    pub fn fit_to(&mut self, width: u32, height: u32) {
        let viewport = Vec2::new(width as f32, height as f32);
        if self.state.time_ticks == 0 {
            self.state.rescale(viewport);
        } else {
            self.state.resize(viewport);
        }
    }

    /// Drop pending deferred work
    pub fn teardown(&mut self) {
        let pending = self.timers.len();
        self.timers.cancel_all();
        log::info!("Scene torn down ({pending} deferred tasks dropped)");
    }
}

// === Driver ===

/// Runs a scene against a surface, one tick and one paint per frame
pub struct FrameDriver<S: DrawSurface> {
    scene: Scene,
    surface: S,
    stop: StopHandle,
    frames: u64,
}

impl<S: DrawSurface> FrameDriver<S> {
    /// Attach a scene to a surface. Without a surface nothing starts.
    pub fn start(mut scene: Scene, surface: Option<S>) -> Option<Self> {
        let Some(surface) = surface else {
            log::warn!("No drawing surface; pond not started");
            return None;
        };
        let (w, h) = surface.size();
        scene.fit_to(w, h);
        log::info!("Frame driver started at {w}x{h}");
        Some(Self {
            scene,
            surface,
            stop: StopHandle::new(),
            frames: 0,
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// One iteration of the loop. Returns false once stopped.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        let frame = self.scene.frame(now_ms);
        match self.surface.present(&frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = self.surface.size();
                log::warn!("Surface lost; reconfiguring at {w}x{h}");
                self.surface.recover();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of GPU memory"),
            Err(e) => log::warn!("Render error: {e:?}"),
        }
        self.frames += 1;
        true
    }

    /// Drive frames from `ticks` until it runs dry or the loop is stopped
    pub fn run(&mut self, ticks: &mut impl TickSource) -> u64 {
        let start = self.frames;
        while !self.stop.is_stopped() {
            let Some(now_ms) = ticks.next_frame() else {
                break;
            };
            self.frame(now_ms);
        }
        self.frames - start
    }

    pub fn click(&mut self, pos: Vec2, now_ms: f64) -> Option<ClickOutcome> {
        if self.stop.is_stopped() {
            return None;
        }
        Some(self.scene.click(pos, now_ms))
    }

    /// Resize both surface and pond; the next frame repaints the new extent
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface.resize(width, height);
        self.scene.resize(width, height);
    }

    /// Stop the loop and drop pending deferred work
    pub fn teardown(&mut self) {
        self.stop.stop();
        self.scene.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedRng;

    fn scene(viewport: Vec2) -> Scene {
        Scene::new(&Settings::default(), viewport, 7)
    }

    fn driver() -> FrameDriver<HeadlessSurface> {
        FrameDriver::start(
            scene(Vec2::new(800.0, 600.0)),
            Some(HeadlessSurface::new(800, 600)),
        )
        .unwrap()
    }

    /// Fails with the queued errors, one per present, then succeeds
    struct FlakySurface {
        errors: Vec<wgpu::SurfaceError>,
        recovered: u32,
        presented: u32,
    }

    impl FlakySurface {
        fn failing_with(mut errors: Vec<wgpu::SurfaceError>) -> Self {
            errors.reverse();
            Self {
                errors,
                recovered: 0,
                presented: 0,
            }
        }
    }

    impl DrawSurface for FlakySurface {
        fn size(&self) -> (u32, u32) {
            (320, 240)
        }

        fn resize(&mut self, _width: u32, _height: u32) {}

        fn present(&mut self, _frame: &Frame) -> Result<(), wgpu::SurfaceError> {
            match self.errors.pop() {
                Some(e) => Err(e),
                None => {
                    self.presented += 1;
                    Ok(())
                }
            }
        }

        fn recover(&mut self) {
            self.recovered += 1;
        }
    }

    #[test]
    fn test_no_surface_does_not_start() {
        let started = FrameDriver::<HeadlessSurface>::start(scene(Vec2::new(10.0, 10.0)), None);
        assert!(started.is_none());
    }

    #[test]
    fn test_one_tick_per_frame() {
        let mut d = driver();
        let ran = d.run(&mut FixedRateTicks::sixty_hz(30));
        assert_eq!(ran, 30);
        assert_eq!(d.scene().state().time_ticks, 30);
        assert_eq!(d.surface().presented(), 30);
    }

    #[test]
    fn test_start_adopts_surface_size() {
        let d = FrameDriver::start(
            scene(Vec2::new(100.0, 100.0)),
            Some(HeadlessSurface::new(640, 480)),
        )
        .unwrap();
        assert_eq!(d.scene().state().viewport, Vec2::new(640.0, 480.0));
    }

    #[test]
    fn test_start_spreads_fish_over_surface() {
        let centered = Scene::with_rng(
            &Settings::default(),
            Vec2::new(100.0, 100.0),
            Box::new(ScriptedRng::constant(0.5)),
        );
        let d = FrameDriver::start(centered, Some(HeadlessSurface::new(640, 480))).unwrap();
        let fish = &d.scene().state().fish;
        assert_eq!(fish.len(), 8);
        assert!(fish.iter().all(|f| f.pos == Vec2::new(320.0, 240.0)));
    }

    #[test]
    fn test_later_resize_keeps_pixel_positions() {
        let mut d = driver();
        d.frame(0.0);
        let before: Vec<Vec2> = d.scene().state().fish.iter().map(|f| f.pos).collect();
        d.resize(1600, 1200);
        let after: Vec<Vec2> = d.scene().state().fish.iter().map(|f| f.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_stop_handle_halts_run() {
        let mut d = driver();
        let handle = d.stop_handle();
        assert!(d.frame(0.0));
        handle.stop();
        assert!(!d.frame(16.0));
        assert_eq!(d.run(&mut FixedRateTicks::sixty_hz(10)), 0);
        assert_eq!(d.scene().state().time_ticks, 1);
        assert!(!d.is_running());
    }

    #[test]
    fn test_lily_bursts_fire_on_schedule() {
        let mut d = driver();
        let (center, _) = d.scene().state().lily_pad_bounds(0).unwrap();
        let outcome = d.click(center, 1000.0);
        assert_eq!(outcome, Some(ClickOutcome::LilyPads(vec![0])));
        assert_eq!(d.scene().pending_tasks(), 3);

        d.frame(1000.0);
        assert_eq!(d.scene().state().ripples.len(), 1);
        d.frame(1100.0);
        assert_eq!(d.scene().state().ripples.len(), 1);
        d.frame(1150.0);
        assert_eq!(d.scene().state().ripples.len(), 2);
        d.frame(1400.0);
        assert_eq!(d.scene().state().ripples.len(), 3);
        assert_eq!(d.scene().pending_tasks(), 0);
    }

    #[test]
    fn test_teardown_drops_pending_bursts() {
        let mut d = driver();
        let (center, _) = d.scene().state().lily_pad_bounds(2).unwrap();
        d.click(center, 0.0);
        d.teardown();
        assert_eq!(d.scene().pending_tasks(), 0);
        assert!(!d.frame(500.0));
        assert!(d.scene().state().ripples.is_empty());
        assert_eq!(d.click(center, 600.0), None);
    }

    #[test]
    fn test_resize_reaches_next_frame() {
        let mut d = driver();
        d.frame(0.0);
        d.resize(1024, 300);
        d.frame(16.0);
        let frame = d.surface().last_frame().unwrap();
        assert_eq!(frame.size, (1024, 300));
        assert_eq!(d.surface().size(), (1024, 300));

        // Zero sizes are ignored
        d.resize(0, 300);
        assert_eq!(d.surface().size(), (1024, 300));
    }

    #[test]
    fn test_lost_surface_recovers_and_keeps_running() {
        let surface = FlakySurface::failing_with(vec![wgpu::SurfaceError::Lost]);
        let mut d = FrameDriver::start(scene(Vec2::ZERO), Some(surface)).unwrap();
        assert_eq!(d.run(&mut FixedRateTicks::sixty_hz(3)), 3);
        assert_eq!(d.surface().recovered, 1);
        assert_eq!(d.surface().presented, 2);
    }

    #[test]
    fn test_out_of_memory_and_timeout_do_not_stop_the_loop() {
        let surface = FlakySurface::failing_with(vec![
            wgpu::SurfaceError::OutOfMemory,
            wgpu::SurfaceError::Timeout,
            wgpu::SurfaceError::OutOfMemory,
        ]);
        let mut d = FrameDriver::start(scene(Vec2::ZERO), Some(surface)).unwrap();
        assert_eq!(d.run(&mut FixedRateTicks::sixty_hz(5)), 5);
        assert!(d.is_running());
        assert_eq!(d.scene().state().time_ticks, 5);
        // Only lost or outdated surfaces are rebuilt
        assert_eq!(d.surface().recovered, 0);
        assert_eq!(d.surface().presented, 2);
    }

    #[test]
    fn test_scene_with_scripted_rng_is_repeatable() {
        let settings = Settings::default();
        let viewport = Vec2::new(500.0, 400.0);
        let script = || Box::new(ScriptedRng::new(vec![0.1, 0.6, 0.3]));
        let mut a = Scene::with_rng(&settings, viewport, script());
        let mut b = Scene::with_rng(&settings, viewport, script());
        for i in 0..20 {
            let now = i as f64 * 16.0;
            assert_eq!(a.frame(now), b.frame(now));
        }
        assert_eq!(a.state().fish, b.state().fish);
    }

    #[test]
    fn test_fixed_rate_ticks() {
        let mut ticks = FixedRateTicks::new(100.0, 10.0, 3);
        assert_eq!(ticks.next_frame(), Some(100.0));
        assert_eq!(ticks.next_frame(), Some(110.0));
        assert_eq!(ticks.next_frame(), Some(120.0));
        assert_eq!(ticks.next_frame(), None);
    }
}
