//! Pointer click handling
//!
//! A click either lands on one or more lily pads (spinning their flowers and
//! queueing a few gentle ripples around each) or on open water (one splash).
//! Either way every fish reacts: those close to the click bolt away, the rest
//! pick a new cruising speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SceneRng;
use super::state::{PondState, Ripple};
use super::timers::TimerRegistry;
use crate::consts::*;
use crate::heading_toward;

/// Work queued by a click for later frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Spawn a small ripple jittered around a lily pad
    LilyBurst { center: Vec2, pad_radius: f32 },
}

impl DeferredTask {
    /// Apply the task to the pond
    pub fn run(self, state: &mut PondState, rng: &mut dyn SceneRng) {
        match self {
            DeferredTask::LilyBurst { center, pad_radius } => {
                state.ripples.push(Ripple::lily_burst(center, pad_radius, rng));
            }
        }
    }
}

/// What a click landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Open water: one splash ripple was added
    Water,
    /// Indices of every lily pad under the pointer
    LilyPads(Vec<usize>),
}

/// Apply a click at `click` (surface pixels) at time `now_ms`
pub fn handle_click(
    state: &mut PondState,
    click: Vec2,
    now_ms: f64,
    rng: &mut dyn SceneRng,
    timers: &mut TimerRegistry<DeferredTask>,
) -> ClickOutcome {
    let viewport = state.viewport;

    // Every pad is tested; overlapping pads all respond
    let mut hits = Vec::new();
    for (index, pad) in state.lily_pads.iter_mut().enumerate() {
        let center = pad.center(viewport);
        let pad_radius = crate::lily_pad_radius(index);
        if click.distance(center) < pad_radius {
            pad.trigger();
            for burst in 0..BURST_COUNT {
                timers.schedule(
                    now_ms + burst as f64 * BURST_INTERVAL_MS,
                    DeferredTask::LilyBurst { center, pad_radius },
                );
            }
            hits.push(index);
        }
    }

    let outcome = if hits.is_empty() {
        state.ripples.push(Ripple::splash(click, rng));
        ClickOutcome::Water
    } else {
        log::debug!("Lily pads {:?} clicked", hits);
        ClickOutcome::LilyPads(hits)
    };

    for fish in &mut state.fish {
        if fish.pos.distance(click) < FLEE_RADIUS {
            fish.heading = heading_toward(click, fish.pos);
            fish.speed = FLEE_SPEED;
        } else {
            fish.speed = rng.range(IDLE_SPEED_MIN, IDLE_SPEED_SPAN);
        }
    }

    outcome
}
