//! Fixed timestep simulation tick and tap handling
//!
//! Core game rules that advance the world deterministically.

use std::f64::consts::E;

use super::state::{Outcome, World};
use crate::consts::*;

/// Result of a single tap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapResult {
    /// Popped the ornament with this id for `award` points
    Hit { id: u32, award: f64 },
    /// Nothing under the pointer, streak reset
    Miss,
    /// Round already over
    Ignored,
}

/// Points lost when an ornament of `size` lands with the score at `score`
#[inline]
pub fn miss_penalty(size: f64, score: f64) -> f64 {
    (2.0 + 3.0 * (1.0 - size / MAX_SIZE)) * (score.abs() / 5.0 + 2.9).ln()
}

/// Points gained for popping an ornament of `size` at the given streak
#[inline]
pub fn pop_award(size: f64, streak: u32) -> f64 {
    1.0 + 5.0 * (1.0 - size / MAX_SIZE) * streak as f64
}

/// Score-dependent divisor of the spawn roll, never below `e`
#[inline]
fn spawn_denominator(score: f64, max_score: f64) -> f64 {
    E.max(score.abs() / max_score * SPAWN_SCORE_SCALE)
}

/// Spawn decision for a uniform draw `u`. Spawns get likelier as |score|
/// approaches the ceiling.
#[inline]
pub fn should_spawn(u: f64, score: f64, max_score: f64) -> bool {
    u / spawn_denominator(score, max_score).ln() < SPAWN_THRESHOLD
}

/// Advance the world by one fixed timestep.
///
/// Returns the outcome if this tick ended the round. A finished world is
/// left untouched.
pub fn tick(world: &mut World) -> Option<Outcome> {
    if world.is_over() {
        return world.outcome();
    }

    // Landed ornaments are removed and each one costs points
    let bounds = world.viewport.sim_bounds();
    let (fallen, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut world.ornaments)
        .into_iter()
        .partition(|o| o.is_fallen(bounds));
    world.ornaments = alive;

    for ornament in &fallen {
        log::debug!("Ornament {} landed (size {:.1})", ornament.id, ornament.size);
        let penalty = miss_penalty(ornament.size, world.score);
        if let Some(outcome) = world.add_score(-penalty) {
            return Some(outcome);
        }
    }

    let elapsed = world.elapsed;
    for ornament in &mut world.ornaments {
        ornament.update(elapsed);
    }

    let u = world.roll();
    if should_spawn(u, world.score, world.max_score) {
        world.spawn();
    }

    world.elapsed += TICK_MS;
    None
}

/// Pop the first ornament (spawn order) under a screen-space tap
pub fn tap(world: &mut World, x: f64, y: f64) -> TapResult {
    if world.is_over() {
        return TapResult::Ignored;
    }

    let point = world.viewport.to_sim(x, y);
    let Some(index) = world.ornaments.iter().position(|o| o.contains_point(point)) else {
        world.eat_streak = 0;
        return TapResult::Miss;
    };

    let ornament = world.ornaments.remove(index);
    world.eat_streak += 1;
    let award = pop_award(ornament.size, world.eat_streak);
    world.add_score(award);
    TapResult::Hit {
        id: ornament.id,
        award,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use glam::DVec2;

    fn world() -> World {
        World::new(12345, DEFAULT_MAX_SCORE, Viewport::new(800.0, 600.0, 1.0))
    }

    /// Place an ornament fully inside the playfield at a known spot
    fn place(world: &mut World, k: f64, x: f64, y: f64) -> u32 {
        let id = world.spawn_with(k).id;
        let o = world.ornaments.last_mut().unwrap();
        o.pos = DVec2::new(x, y);
        id
    }

    #[test]
    fn test_spawn_threshold_at_zero_score() {
        assert_eq!(spawn_denominator(0.0, 500.0), E);
        assert!(should_spawn(0.0149, 0.0, 500.0));
        assert!(!should_spawn(0.0151, 0.0, 500.0));
    }

    #[test]
    fn test_spawn_threshold_grows_with_score_scale() {
        // denom = |score| / max * 1000, clamped below at e
        assert_eq!(spawn_denominator(1.0, 500.0), E);
        assert!((spawn_denominator(-400.0, 500.0) - 800.0).abs() < 1e-9);
        // ln 800 ~ 6.68, so the threshold is ~0.1
        assert!(should_spawn(0.099, 400.0, 500.0));
        assert!(!should_spawn(0.101, 400.0, 500.0));
        assert!(!should_spawn(0.099, 1.0, 500.0));
    }

    #[test]
    fn test_max_size_pop_awards_one() {
        let mut w = world();
        place(&mut w, 1.0, 200.0, 200.0);
        w.ornaments[0].size = MAX_SIZE;
        w.ornaments[0].width = MAX_SIZE;
        w.ornaments[0].origin = DVec2::splat(MAX_SIZE / 2.0);
        let result = tap(&mut w, 190.0, 190.0);
        assert_eq!(w.eat_streak, 1);
        assert!(matches!(result, TapResult::Hit { award, .. } if award == 1.0));
        assert_eq!(w.score, 1.0);
        assert!(w.ornaments.is_empty());
    }

    #[test]
    fn test_tap_hits_first_in_spawn_order() {
        let mut w = world();
        let first = place(&mut w, 0.5, 300.0, 300.0);
        let second = place(&mut w, 0.5, 300.0, 300.0);
        let result = tap(&mut w, 300.0, 300.0);
        assert!(matches!(result, TapResult::Hit { id, .. } if id == first));
        assert_eq!(w.ornaments.len(), 1);
        assert_eq!(w.ornaments[0].id, second);
    }

    #[test]
    fn test_miss_resets_streak() {
        let mut w = world();
        place(&mut w, 0.5, 300.0, 300.0);
        place(&mut w, 0.5, 500.0, 300.0);
        tap(&mut w, 300.0, 300.0);
        tap(&mut w, 500.0, 300.0);
        assert_eq!(w.eat_streak, 2);
        assert_eq!(tap(&mut w, 5.0, 5.0), TapResult::Miss);
        assert_eq!(w.eat_streak, 0);
    }

    #[test]
    fn test_streak_multiplies_award() {
        let mut w = world();
        place(&mut w, 0.0, 300.0, 300.0);
        place(&mut w, 0.0, 500.0, 300.0);
        tap(&mut w, 300.0, 300.0);
        let result = tap(&mut w, 500.0, 300.0);
        let expected = 1.0 + 5.0 * (1.0 - MIN_SIZE / MAX_SIZE) * 2.0;
        assert!(matches!(result, TapResult::Hit { award, .. } if (award - expected).abs() < 1e-12));
    }

    #[test]
    fn test_fallen_ornament_costs_points_and_keeps_streak() {
        let mut w = world();
        w.eat_streak = 3;
        place(&mut w, 1.0, 300.0, 700.0);
        w.ornaments[0].size = MAX_SIZE;
        tick(&mut w);
        assert!(w.ornaments.iter().all(|o| o.id != 1));
        assert!((w.score + 2.0 * 2.9f64.ln()).abs() < 1e-12);
        assert_eq!(w.eat_streak, 3);
    }

    #[test]
    fn test_tick_advances_time() {
        let mut w = world();
        tick(&mut w);
        tick(&mut w);
        assert!((w.elapsed - 2.0 * TICK_MS).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_landings_end_in_loss() {
        let mut w = world();
        let mut outcome = None;
        for _ in 0..200 {
            place(&mut w, 1.0, 300.0, 10_000.0);
            let o = w.ornaments.last_mut().unwrap();
            o.size = MAX_SIZE;
            let before = w.score;
            outcome = tick(&mut w);
            if outcome.is_some() {
                break;
            }
            assert!(w.score < before);
            assert!(w.score >= MIN_SCORE);
        }
        assert_eq!(outcome, Some(Outcome::Lost));
        assert!(w.score < MIN_SCORE);
    }

    #[test]
    fn test_finished_world_is_frozen() {
        let mut w = world();
        w.add_score(-200.0);
        place(&mut w, 0.5, 300.0, 300.0);
        let snapshot = w.ornaments.clone();
        let elapsed = w.elapsed;
        assert_eq!(tick(&mut w), Some(Outcome::Lost));
        assert_eq!(tap(&mut w, 300.0, 300.0), TapResult::Ignored);
        assert_eq!(w.ornaments, snapshot);
        assert_eq!(w.elapsed, elapsed);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut w = world();
            for i in 0..5000 {
                tick(&mut w);
                if i % 37 == 0 {
                    let target = w.ornaments.first().map(|o| o.pos);
                    if let Some(p) = target {
                        tap(&mut w, p.x, p.y);
                    } else {
                        tap(&mut w, 0.0, 0.0);
                    }
                }
            }
            (w.score, w.eat_streak, w.outcome(), w.ornaments.len())
        };
        assert_eq!(run(), run());
    }
}
