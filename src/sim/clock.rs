//! Fixed timestep accumulator
//!
//! Converts wall-clock frame times into a whole number of simulation ticks.

use crate::consts::TICK_MS;

/// Wall clock to tick converter
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Tick length in milliseconds
    pub tick_ms: f64,
    /// Time scale applied to wall-clock deltas
    pub speed: f64,
    /// Optional catch-up cap. `None` replays every missed tick.
    pub max_ticks_per_frame: Option<u32>,
    accumulator: f64,
    last_ms: Option<f64>,
}

impl SimClock {
    /// A cap of zero would never tick, so it is treated as no cap
    pub fn new(speed: f64, max_ticks_per_frame: Option<u32>) -> Self {
        Self {
            tick_ms: TICK_MS,
            speed,
            max_ticks_per_frame: max_ticks_per_frame.filter(|&cap| cap > 0),
            accumulator: 0.0,
            last_ms: None,
        }
    }

    /// Start measuring from `now_ms` without emitting ticks
    pub fn start(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
        self.accumulator = 0.0;
    }

    /// Feed the current frame time, returns the number of ticks to run.
    ///
    /// The first call only records the time.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0;
        };
        // Clocks can step backwards (tab restore, test clocks); never rewind
        let dt = (now_ms - last).max(0.0);
        self.accumulator += dt * self.speed;

        let mut ticks = 0u32;
        while self.accumulator >= self.tick_ms {
            if self.max_ticks_per_frame.is_some_and(|cap| ticks >= cap) {
                log::warn!(
                    "Frame backlog of {:.1}ms exceeds catch-up cap of {} ticks, dropping it",
                    self.accumulator,
                    ticks
                );
                self.accumulator %= self.tick_ms;
                break;
            }
            self.accumulator -= self.tick_ms;
            ticks += 1;
        }
        ticks
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_emits_nothing() {
        let mut clock = SimClock::default();
        assert_eq!(clock.advance(1000.0), 0);
    }

    #[test]
    fn test_same_timestamp_is_idempotent() {
        let mut clock = SimClock::default();
        clock.start(0.0);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_accumulates_partial_ticks() {
        let mut clock = SimClock::default();
        clock.start(0.0);
        assert_eq!(clock.advance(10.0), 0);
        assert_eq!(clock.advance(20.0), 1);
        assert_eq!(clock.advance(40.0), 1);
        assert_eq!(clock.advance(41.0), 0);
    }

    #[test]
    fn test_stall_catches_up_uncapped() {
        let mut clock = SimClock::default();
        clock.start(0.0);
        // Ten seconds in the background
        assert_eq!(clock.advance(10_005.0), 600);
    }

    #[test]
    fn test_cap_drops_backlog() {
        let mut clock = SimClock::new(1.0, Some(8));
        clock.start(0.0);
        assert_eq!(clock.advance(10_010.0), 8);
        assert_eq!(clock.advance(10_010.0), 0);
        // Only the ~10ms remainder survives the drop
        assert_eq!(clock.advance(10_020.0), 1);
    }

    #[test]
    fn test_zero_cap_means_uncapped() {
        let mut clock = SimClock::new(1.0, Some(0));
        assert_eq!(clock.max_ticks_per_frame, None);
        clock.start(0.0);
        assert_eq!(clock.advance(10_005.0), 600);
    }

    #[test]
    fn test_speed_scales_time() {
        let mut clock = SimClock::new(2.0, None);
        clock.start(0.0);
        assert_eq!(clock.advance(1004.0), 120);
    }

    #[test]
    fn test_backwards_time_is_ignored() {
        let mut clock = SimClock::default();
        clock.start(500.0);
        assert_eq!(clock.advance(100.0), 0);
        assert_eq!(clock.advance(100.0 + 1000.0 / 60.0 + 0.01), 1);
    }
}
