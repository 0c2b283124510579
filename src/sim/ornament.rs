//! Falling ornament entity
//!
//! Motion is a closed-form function of the world's elapsed time and the
//! ornament's own phase. No velocity is stored between ticks.

use glam::DVec2;
use serde::Serialize;

use crate::consts::*;

/// A single falling snowflake
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ornament {
    pub id: u32,
    /// Canonical size (height, and width until the asset aspect is known).
    /// Fixed at spawn; scoring always reads this.
    pub size: f64,
    /// Display/hit width, `size * aspect` once the asset has resolved
    pub width: f64,
    /// Anchor position in simulation space
    pub pos: DVec2,
    /// Rotation pivot relative to `pos`
    pub origin: DVec2,
    /// Current rotation (radians), recomputed each tick
    pub rotation: f64,
    /// Per-ornament seed in [0, 1), drives the drift waveform
    pub phase: f64,
    /// World elapsed time when spawned
    pub spawn_tick: f64,
}

impl Ornament {
    pub fn new(id: u32, size: f64, pos: DVec2, phase: f64, spawn_tick: f64) -> Self {
        Self {
            id,
            size,
            width: size,
            pos,
            origin: DVec2::splat(0.5 * size),
            rotation: 0.0,
            phase,
            spawn_tick,
        }
    }

    /// Stretch the display width to match the real image aspect ratio
    pub fn correct_aspect(&mut self, aspect: f64) {
        self.width = self.size * aspect;
        self.origin.x = 0.5 * self.width;
    }

    /// Argument of the drift waveform at world time `elapsed`
    #[inline]
    fn wave(&self, elapsed: f64) -> f64 {
        TIME_SCALE * elapsed * self.phase + PHASE_SPREAD * self.phase
    }

    /// Per-tick displacement. Never negative on either axis.
    pub fn drift(&self, elapsed: f64) -> DVec2 {
        let w = self.wave(elapsed);
        DVec2::new(
            (w.cos() + DRIFT_BIAS_X).max(0.0),
            (w.sin() + DRIFT_BIAS_Y).max(0.0),
        )
    }

    /// Advance one tick
    pub fn update(&mut self, elapsed: f64) {
        self.pos += self.drift(elapsed);
        self.rotation = ROTATION_AMPLITUDE * self.wave(elapsed).cos();
    }

    /// Left the playfield. `bounds` is the viewport in simulation space.
    ///
    /// The left check compares `x - width`, so an ornament spawned closer to
    /// the left edge than its own width counts as fallen immediately.
    pub fn is_fallen(&self, bounds: DVec2) -> bool {
        self.pos.y - self.size >= bounds.y
            || self.pos.x - self.width >= bounds.x
            || self.pos.x - self.width < 0.0
    }

    /// Hit test against the unrotated sprite box. `point` is in simulation space.
    pub fn contains_point(&self, point: DVec2) -> bool {
        let q = point + self.origin;
        self.pos.x <= q.x
            && q.x < self.pos.x + self.width
            && self.pos.y <= q.y
            && q.y < self.pos.y + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flake(x: f64, y: f64, size: f64) -> Ornament {
        Ornament::new(1, size, DVec2::new(x, y), 0.25, 0.0)
    }

    #[test]
    fn test_drift_never_negative() {
        for i in 0..100 {
            let o = Ornament::new(1, 20.0, DVec2::ZERO, i as f64 / 100.0, 0.0);
            for t in [0.0, 16.6, 1000.0, 123_456.0] {
                let d = o.drift(t);
                assert!(d.x >= 0.0 && d.y >= 0.0);
            }
        }
    }

    #[test]
    fn test_update_matches_closed_form() {
        let mut o = flake(100.0, 0.0, 30.0);
        let elapsed = 5000.0;
        let w = TIME_SCALE * elapsed * 0.25 + PHASE_SPREAD * 0.25;
        o.update(elapsed);
        assert!((o.pos.x - (100.0 + (w.cos() + DRIFT_BIAS_X).max(0.0))).abs() < 1e-12);
        assert!((o.pos.y - (w.sin() + DRIFT_BIAS_Y).max(0.0)).abs() < 1e-12);
        assert!((o.rotation - ROTATION_AMPLITUDE * w.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_is_not_cumulative() {
        let mut o = flake(100.0, 0.0, 30.0);
        o.update(1000.0);
        let first = o.rotation;
        o.update(2000.0);
        o.update(1000.0);
        assert_eq!(o.rotation, first);
    }

    #[test]
    fn test_is_fallen_edges() {
        let bounds = DVec2::new(800.0, 600.0);
        assert!(!flake(100.0, 100.0, 20.0).is_fallen(bounds));
        // Trailing edge past the bottom
        assert!(flake(100.0, 620.0, 20.0).is_fallen(bounds));
        assert!(!flake(100.0, 619.0, 20.0).is_fallen(bounds));
        // Past the right edge
        assert!(flake(820.0, 100.0, 20.0).is_fallen(bounds));
        // Left check uses the width, not zero
        assert!(flake(19.0, 100.0, 20.0).is_fallen(bounds));
        assert!(!flake(20.0, 100.0, 20.0).is_fallen(bounds));
    }

    #[test]
    fn test_contains_point_box() {
        // Box spans [pos - origin, pos - origin + size)
        let o = flake(100.0, 100.0, 20.0);
        assert!(o.contains_point(DVec2::new(90.0, 90.0)));
        assert!(o.contains_point(DVec2::new(109.9, 109.9)));
        assert!(!o.contains_point(DVec2::new(110.0, 100.0)));
        assert!(!o.contains_point(DVec2::new(89.9, 100.0)));
    }

    #[test]
    fn test_hit_test_ignores_rotation() {
        let mut o = flake(100.0, 100.0, 20.0);
        let before = o.contains_point(DVec2::new(91.0, 91.0));
        o.rotation = 1.0;
        assert_eq!(before, o.contains_point(DVec2::new(91.0, 91.0)));
    }

    #[test]
    fn test_correct_aspect_keeps_size() {
        let mut o = flake(100.0, 100.0, 20.0);
        o.correct_aspect(2.0);
        assert_eq!(o.size, 20.0);
        assert_eq!(o.width, 40.0);
        assert_eq!(o.origin, DVec2::new(20.0, 10.0));
    }
}
