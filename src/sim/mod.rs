//! Pond simulation module
//!
//! All scene logic lives here. This module must stay platform-free:
//! - One tick per displayed frame
//! - Randomness only through `SceneRng`
//! - Delayed work only through `TimerRegistry`
//! - No rendering or platform dependencies

pub mod interact;
pub mod rng;
pub mod state;
pub mod tick;
pub mod timers;

pub use interact::{ClickOutcome, DeferredTask, handle_click};
pub use rng::{SceneRng, ScriptedRng, seeded};
pub use state::{Fish, KOI_PATTERNS, LILY_LAYOUT, LilyPad, Particle, PondState, Ripple};
pub use tick::tick;
pub use timers::{TimerId, TimerRegistry};
