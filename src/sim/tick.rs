//! Per-frame simulation tick
//!
//! One call advances the pond by exactly one frame. Fish, ripples and lily
//! pads are independent of each other within a tick.

use super::rng::SceneRng;
use super::state::PondState;
use crate::consts::*;
use crate::heading_toward;

/// Advance the pond by one frame
pub fn tick(state: &mut PondState, rng: &mut dyn SceneRng) {
    state.time_ticks += 1;

    let viewport = state.viewport;
    let center = state.center();
    for fish in &mut state.fish {
        fish.swim();

        // Turn back toward the middle once well outside the visible area
        if fish.out_of_bounds(viewport) {
            fish.heading = heading_toward(fish.pos, center);
        }

        // Idle wandering
        if rng.unit() < WANDER_CHANCE {
            fish.heading += rng.centered(WANDER_SPREAD);
        }

        fish.tail_phase += TAIL_PHASE_STEP;
        fish.fin_phase += FIN_PHASE_STEP;
    }

    // Grow, fade and cull in a single pass
    state.ripples.retain_mut(|ripple| ripple.advance());

    for pad in &mut state.lily_pads {
        pad.advance();
    }
}
