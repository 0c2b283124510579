//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod ornament;
pub mod state;
pub mod tick;

pub use clock::SimClock;
pub use ornament::Ornament;
pub use state::{Outcome, Viewport, World};
pub use tick::{TapResult, miss_penalty, pop_award, tap, tick};
