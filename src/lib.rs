//! Snowfall - tap the falling snowflakes before they land
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ornaments, spawning, scoring, fixed-step clock)
//! - `round`: Round state machine (playing, won/lost, epilogue, terminated)
//! - `epilogue`: Scripted end-of-round reveals driven by wall-clock delays
//! - `assets`: Image source resolution with ordered fallback
//! - `renderer`: Drawing surface abstraction and the presenter
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Score ceiling storage

pub mod assets;
pub mod epilogue;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod round;
pub mod settings;
pub mod sim;

pub use assets::AssetResolver;
pub use round::{GameRound, RoundPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Score bounds. Leaving [MIN_SCORE, ceiling] ends the round.
    pub const MIN_SCORE: f64 = -100.0;
    /// Ceiling used when nothing has been persisted yet
    pub const DEFAULT_MAX_SCORE: f64 = 500.0;
    /// Ceiling growth applied on every win
    pub const CEILING_GROWTH: f64 = 1.3;

    /// Ornament size range (square, simulation pixels)
    pub const MIN_SIZE: f64 = 15.0;
    pub const MAX_SIZE: f64 = MIN_SIZE + 40.0;

    /// Drift waveform
    pub const TIME_SCALE: f64 = 0.001;
    pub const PHASE_SPREAD: f64 = 200.0;
    pub const DRIFT_BIAS_X: f64 = 0.72;
    pub const DRIFT_BIAS_Y: f64 = 1.5;
    pub const ROTATION_AMPLITUDE: f64 = 0.03;

    /// Spawn policy: spawn iff u / ln(denom) < SPAWN_THRESHOLD
    pub const SPAWN_THRESHOLD: f64 = 0.015;
    pub const SPAWN_SCORE_SCALE: f64 = 1000.0;

    /// Score bar height in canvas pixels
    pub const SCORE_BAR_HEIGHT: f64 = 20.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
