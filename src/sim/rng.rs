//! Random source used by the simulation
//!
//! Everything random in the pond (spawn layout, idle wandering, click speeds,
//! splash particles) draws from a `SceneRng`, so a test can swap in a fixed
//! sequence and a seeded run replays exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples in `[0, 1)`
pub trait SceneRng {
    /// Next uniform sample in `[0, 1)`
    fn unit(&mut self) -> f32;

    /// Uniform sample in `[min, min + span)`
    fn range(&mut self, min: f32, span: f32) -> f32 {
        min + self.unit() * span
    }

    /// Uniform sample in `[-spread/2, spread/2)`
    fn centered(&mut self, spread: f32) -> f32 {
        (self.unit() - 0.5) * spread
    }

    /// Uniform index in `[0, len)`
    fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl SceneRng for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded production RNG
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0.5);
        }
        for v in &mut values {
            *v = v.clamp(0.0, 0.999_999);
        }
        Self { values, cursor: 0 }
    }

    /// Always returns the same sample
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl SceneRng for ScriptedRng {
    fn unit(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
