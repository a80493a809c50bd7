//! Pond state and entity types
//!
//! Every entity lives for the lifetime of the scene except ripples, which are
//! culled by `tick` once they fade out or reach their maximum radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SceneRng;
use crate::consts::*;
use crate::{heading_vector, lily_pad_radius};

/// Koi color pattern (primary, secondary) as 0xRRGGBB
pub const KOI_PATTERNS: [(u32, u32); 8] = [
    (0xFF6B6B, 0xFF8E8E), // bright red
    (0xFFA500, 0xFFD700), // orange to gold
    (0xFFFFFF, 0xFFE4B5), // white to cream
    (0xFF1493, 0xFFA0D2), // deep pink
    (0x4169E1, 0x87CEEB), // royal blue to sky blue
    (0xFF4500, 0xFF8C00), // orange red
    (0xFFD700, 0xFFF8DC), // gold to cornsilk
    (0xFF69B4, 0xFFB6C1), // hot pink
];

/// Lily pad layout: anchor (fractions of the viewport), flower color, center color
pub const LILY_LAYOUT: [((f32, f32), u32, u32); 5] = [
    ((0.25, 0.4), 0xF5E6F0, 0xF9E4A0),
    ((0.7, 0.55), 0xFFF5F7, 0xFFE9B3),
    ((0.6, 0.75), 0xE8E4F3, 0xF5D0A9),
    ((0.35, 0.65), 0xFFE8E8, 0xFFE6A7),
    ((0.8, 0.3), 0xF0F5F5, 0xF0E68C),
];

/// A koi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    pub pos: Vec2,
    /// Heading (radians)
    pub heading: f32,
    /// Distance travelled per tick
    pub speed: f32,
    /// Body half-length in pixels
    pub size: f32,
    pub color: u32,
    pub secondary_color: u32,
    /// Tail wag phase (unbounded)
    pub tail_phase: f32,
    /// Fin wave phase (unbounded)
    pub fin_phase: f32,
}

impl Fish {
    /// Spawn a fish somewhere inside the viewport
    pub fn spawn(viewport: Vec2, rng: &mut dyn SceneRng) -> Self {
        let (color, secondary_color) = KOI_PATTERNS[rng.index(KOI_PATTERNS.len())];
        Self {
            pos: Vec2::new(rng.unit() * viewport.x, rng.unit() * viewport.y),
            heading: rng.unit() * std::f32::consts::TAU,
            speed: rng.range(0.3, 0.4),
            size: rng.range(35.0, 35.0),
            color,
            secondary_color,
            tail_phase: rng.unit() * std::f32::consts::TAU,
            fin_phase: rng.unit() * std::f32::consts::TAU,
        }
    }

    /// Step forward along the current heading
    pub fn swim(&mut self) {
        self.pos += heading_vector(self.heading) * self.speed;
    }

    /// True once the fish is further than the margin outside the viewport
    pub fn out_of_bounds(&self, viewport: Vec2) -> bool {
        self.pos.x < -BOUNDARY_MARGIN
            || self.pos.x > viewport.x + BOUNDARY_MARGIN
            || self.pos.y < -BOUNDARY_MARGIN
            || self.pos.y > viewport.y + BOUNDARY_MARGIN
    }
}

/// A droplet thrown outward by a ripple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Direction from the ripple origin (radians)
    pub angle: f32,
    /// Distance travelled from the origin
    pub distance: f32,
    /// Outward distance per tick
    pub speed: f32,
    /// Droplet radius
    pub size: f32,
}

impl Particle {
    /// Current position given the ripple origin
    pub fn position(&self, origin: Vec2) -> Vec2 {
        origin + heading_vector(self.angle) * self.distance
    }
}

/// An expanding ring on the water surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub origin: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    /// Ticks since spawn
    pub age: u32,
    pub particles: Vec<Particle>,
}

impl Ripple {
    pub fn new(origin: Vec2, max_radius: f32, alpha: f32, particles: Vec<Particle>) -> Self {
        Self {
            origin,
            radius: 0.0,
            max_radius,
            alpha,
            age: 0,
            particles,
        }
    }

    /// Splash from a click on open water
    pub fn splash(origin: Vec2, rng: &mut dyn SceneRng) -> Self {
        let particles = (0..SPLASH_PARTICLES)
            .map(|i| Particle {
                angle: i as f32 / SPLASH_PARTICLES as f32 * std::f32::consts::TAU
                    + rng.centered(0.2),
                distance: 0.0,
                speed: rng.range(1.2, 0.8),
                size: rng.range(2.0, 3.0),
            })
            .collect();
        Self::new(origin, SPLASH_MAX_RADIUS, SPLASH_ALPHA, particles)
    }

    /// Gentle ripple near a lily pad, jittered within half the pad radius
    pub fn lily_burst(center: Vec2, pad_radius: f32, rng: &mut dyn SceneRng) -> Self {
        let particles = (0..BURST_PARTICLES)
            .map(|j| Particle {
                angle: j as f32 / BURST_PARTICLES as f32 * std::f32::consts::TAU
                    + rng.unit() * 0.3,
                distance: 0.0,
                speed: rng.range(0.8, 0.4),
                size: rng.range(2.0, 2.0),
            })
            .collect();
        let jitter = Vec2::new(
            rng.centered(pad_radius * 0.5),
            rng.centered(pad_radius * 0.5),
        );
        Self::new(center + jitter, BURST_MAX_RADIUS, BURST_ALPHA, particles)
    }

    /// Advance one tick. Returns false once the ripple should be removed.
    pub fn advance(&mut self) -> bool {
        self.radius += RIPPLE_GROWTH;
        self.alpha -= RIPPLE_FADE;
        self.age += 1;
        for p in &mut self.particles {
            p.distance += p.speed;
        }
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0 && self.radius < self.max_radius
    }
}

/// A lily pad with a flower that spins when clicked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LilyPad {
    /// Position as fractions (0..1) of the viewport
    pub anchor: Vec2,
    pub flower_color: u32,
    pub center_color: u32,
    /// Remaining animation ticks (0 = idle)
    pub animation: u32,
    /// Petal spin (radians), reset to 0 when idle
    pub petal_rotation: f32,
}

impl LilyPad {
    pub fn new(anchor: Vec2, flower_color: u32, center_color: u32) -> Self {
        Self {
            anchor,
            flower_color,
            center_color,
            animation: 0,
            petal_rotation: 0.0,
        }
    }

    /// Pixel center for the given viewport
    pub fn center(&self, viewport: Vec2) -> Vec2 {
        self.anchor * viewport
    }

    pub fn is_animating(&self) -> bool {
        self.animation > 0
    }

    /// Start (or restart) the flower animation
    pub fn trigger(&mut self) {
        self.animation = LILY_ANIMATION_TICKS;
    }

    /// Count down the animation and spin the petals while it runs
    pub fn advance(&mut self) {
        if self.animation > 0 {
            self.animation -= 1;
            self.petal_rotation += PETAL_ROTATION_STEP;
        } else {
            self.petal_rotation = 0.0;
        }
    }
}

/// Complete pond state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PondState {
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub fish: Vec<Fish>,
    pub ripples: Vec<Ripple>,
    pub lily_pads: Vec<LilyPad>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl PondState {
    /// Populate a pond of the given size
    pub fn new(viewport: Vec2, fish_count: usize, rng: &mut dyn SceneRng) -> Self {
        let fish = (0..fish_count).map(|_| Fish::spawn(viewport, rng)).collect();
        let lily_pads = LILY_LAYOUT
            .iter()
            .map(|&((x, y), flower, center)| LilyPad::new(Vec2::new(x, y), flower, center))
            .collect();

        Self {
            viewport,
            fish,
            ripples: Vec::new(),
            lily_pads,
            time_ticks: 0,
        }
    }

    /// Viewport center in pixels
    pub fn center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Track a new viewport size. Entities keep their pixel positions.
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Stretch the pond onto a new viewport, keeping fish at the same
    /// relative spot. Falls back to `resize` when the old viewport is empty.
    pub fn rescale(&mut self, viewport: Vec2) {
        let old = self.viewport;
        if old.x > 0.0 && old.y > 0.0 {
            let ratio = viewport / old;
            for fish in &mut self.fish {
                fish.pos *= ratio;
            }
            for ripple in &mut self.ripples {
                ripple.origin *= ratio;
            }
        }
        self.resize(viewport);
    }

    /// Pixel center and radius of the lily pad at `index`
    pub fn lily_pad_bounds(&self, index: usize) -> Option<(Vec2, f32)> {
        self.lily_pads
            .get(index)
            .map(|pad| (pad.center(self.viewport), lily_pad_radius(index)))
    }
}
