//! World state and core simulation types
//!
//! Everything the tick and tap rules touch lives in one owned `World`.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ornament::Ornament;
use crate::consts::*;
use crate::lerp;

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Outcome for a score that has just left the bounds
    pub fn from_score(score: f64) -> Self {
        if score >= 0.0 { Outcome::Won } else { Outcome::Lost }
    }
}

/// Canvas size in CSS pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Playfield bounds in simulation space
    pub fn sim_bounds(&self) -> DVec2 {
        DVec2::new(self.width, self.height) * self.pixel_ratio
    }

    /// Convert a screen-space tap to simulation space
    pub fn to_sim(&self, x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y) * self.pixel_ratio
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, 1.0)
    }
}

/// Complete simulation state for one round
#[derive(Debug, Clone)]
pub struct World {
    /// Live ornaments in spawn order
    pub ornaments: Vec<Ornament>,
    /// Simulation time in milliseconds
    pub elapsed: f64,
    pub score: f64,
    /// Consecutive hits since the last missed tap. Starts at 0, the first
    /// hit makes it 1.
    pub eat_streak: u32,
    pub min_score: f64,
    pub max_score: f64,
    pub viewport: Viewport,
    /// Asset aspect ratio (width / height) once known
    aspect: Option<f64>,
    /// Set the moment the score leaves its bounds
    outcome: Option<Outcome>,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create a new world with the given seed and score ceiling
    pub fn new(seed: u64, max_score: f64, viewport: Viewport) -> Self {
        Self {
            ornaments: Vec::new(),
            elapsed: 0.0,
            score: 0.0,
            eat_streak: 0,
            min_score: MIN_SCORE,
            max_score,
            viewport,
            aspect: None,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Apply a score delta and check the bounds. Refused once the round is over.
    pub fn add_score(&mut self, delta: f64) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.score += delta;
        if !(self.min_score <= self.score && self.score <= self.max_score) {
            let outcome = Outcome::from_score(self.score);
            log::info!("Score {:.2} left bounds: {:?}", self.score, outcome);
            self.outcome = Some(outcome);
        }
        self.outcome
    }

    /// Uniform draw in [0, 1) from the round's RNG
    pub fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a new ornament above the top edge.
    ///
    /// One draw is used for size, horizontal position and drift phase.
    pub fn spawn(&mut self) -> &Ornament {
        let k = self.roll();
        self.spawn_with(k)
    }

    /// Spawn with an explicit draw `k` in [0, 1)
    pub fn spawn_with(&mut self, k: f64) -> &Ornament {
        let id = self.next_entity_id();
        let size = lerp(MIN_SIZE, MAX_SIZE, k);
        let pos = DVec2::new(0.5 * k * self.viewport.width, -size);
        let mut ornament = Ornament::new(id, size, pos, k, self.elapsed);
        if let Some(aspect) = self.aspect {
            ornament.correct_aspect(aspect);
        }
        self.ornaments.push(ornament);
        &self.ornaments[self.ornaments.len() - 1]
    }

    /// Record the asset aspect ratio and re-shape every live ornament
    pub fn correct_aspect(&mut self, aspect: f64) {
        if !aspect.is_finite() || aspect <= 0.0 {
            log::warn!("Ignoring invalid asset aspect ratio {aspect}");
            return;
        }
        self.aspect = Some(aspect);
        for ornament in &mut self.ornaments {
            ornament.correct_aspect(aspect);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
