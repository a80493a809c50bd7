//! Koi Pond - an interactive zen pond
//!
//! Core modules:
//! - `sim`: Pond simulation (fish, ripples, lily pads, click handling)
//! - `renderer`: Canvas-style tessellation and the WebGPU pipeline
//! - `driver`: Scene controller and frame loop
//! - `audio`: Background music on/off control
//! - `countdown`: Cosmetic countdown widget
//! - `settings`: Preferences and quality presets

pub mod audio;
pub mod countdown;
pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use countdown::Countdown;
pub use driver::{FrameDriver, Scene, StopHandle};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Pond configuration constants
pub mod consts {
    /// Number of koi swimming in the pond
    pub const FISH_COUNT: usize = 8;
    /// How far a fish may leave the visible area before turning back
    pub const BOUNDARY_MARGIN: f32 = 50.0;
    /// Per-tick chance of an idle heading change
    pub const WANDER_CHANCE: f32 = 0.01;
    /// Idle heading change spans ±WANDER_SPREAD/2 radians
    pub const WANDER_SPREAD: f32 = 0.5;
    /// Tail oscillation phase step per tick (radians)
    pub const TAIL_PHASE_STEP: f32 = 0.08;
    /// Fin oscillation phase step per tick (radians)
    pub const FIN_PHASE_STEP: f32 = 0.1;

    /// Ripple ring growth per tick
    pub const RIPPLE_GROWTH: f32 = 2.5;
    /// Ripple fade per tick
    pub const RIPPLE_FADE: f32 = 0.008;

    /// Water click ripple
    pub const SPLASH_PARTICLES: usize = 12;
    pub const SPLASH_MAX_RADIUS: f32 = 120.0;
    pub const SPLASH_ALPHA: f32 = 0.7;

    /// Lily pad burst ripple
    pub const BURST_COUNT: usize = 3;
    pub const BURST_INTERVAL_MS: f64 = 150.0;
    pub const BURST_PARTICLES: usize = 6;
    pub const BURST_MAX_RADIUS: f32 = 80.0;
    pub const BURST_ALPHA: f32 = 0.5;

    /// Lily pad geometry and animation
    pub const LILY_BASE_RADIUS: f32 = 40.0;
    pub const LILY_RADIUS_STEP: f32 = 5.0;
    pub const LILY_ANIMATION_TICKS: u32 = 50;
    pub const PETAL_ROTATION_STEP: f32 = 0.05;

    /// Fish within this distance of a click flee from it
    pub const FLEE_RADIUS: f32 = 150.0;
    pub const FLEE_SPEED: f32 = 2.0;
    /// Idle speed after a distant click is drawn from [MIN, MIN + SPAN)
    pub const IDLE_SPEED_MIN: f32 = 0.5;
    pub const IDLE_SPEED_SPAN: f32 = 0.5;

    /// Fountain placement (fractions of the viewport) and size
    pub const FOUNTAIN_X: f32 = 0.5;
    pub const FOUNTAIN_Y: f32 = 0.2;
    pub const FOUNTAIN_SIZE: f32 = 40.0;
}

/// Radius of the lily pad at `index` in the pond's fixed pad list
#[inline]
pub fn lily_pad_radius(index: usize) -> f32 {
    consts::LILY_BASE_RADIUS + consts::LILY_RADIUS_STEP * index as f32
}

/// Heading (radians) pointing from `from` toward `to`
#[inline]
pub fn heading_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lily_pad_radius_grows_with_index() {
        assert_eq!(lily_pad_radius(0), 40.0);
        assert_eq!(lily_pad_radius(4), 60.0);
    }

    #[test]
    fn test_heading_toward() {
        let h = heading_toward(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((h - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let v = heading_vector(h);
        assert!(v.x.abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_host_page_has_the_wired_elements() {
        let page = include_str!("../index.html");
        for id in ["canvas", "music-toggle", "timer", "music"] {
            assert!(page.contains(&format!("id=\"{id}\"")), "missing #{id}");
        }
        assert!(page.contains("🔇 Play Music"));
    }
}
