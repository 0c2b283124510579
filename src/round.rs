//! Round state machine
//!
//! `Playing -> {Won, Lost} -> Epilogue -> Terminated`. Nothing re-enters
//! `Playing`; a new round means a new `GameRound`.

use serde::Serialize;

use crate::epilogue::{Epilogue, lost_script, won_script};
use crate::persistence::{CeilingStore, grow_ceiling, read_ceiling};
use crate::settings::Settings;
use crate::sim::{Ornament, Outcome, SimClock, TapResult, Viewport, World, tap, tick};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundPhase {
    /// Simulation running, taps accepted
    Playing,
    /// Score went over the ceiling, epilogue starts next frame
    Won,
    /// Score went under the floor, epilogue starts next frame
    Lost,
    /// Scripted end screen playing
    Epilogue,
    /// Absorbing. No ticks, draws or input.
    Terminated,
}

/// Serializable snapshot of a round
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary<'a> {
    pub phase: RoundPhase,
    pub outcome: Option<Outcome>,
    pub score: f64,
    pub eat_streak: u32,
    pub max_score: f64,
    pub elapsed_ms: f64,
    pub viewport: Viewport,
    pub ornaments: &'a [Ornament],
}

/// One round of the game, from first frame to navigation
pub struct GameRound {
    world: World,
    clock: SimClock,
    phase: RoundPhase,
    store: Box<dyn CeilingStore>,
    settings: Settings,
    epilogue: Option<Epilogue>,
}

impl GameRound {
    /// Start a round. The score ceiling is read from `store` once, here.
    pub fn new(settings: Settings, store: Box<dyn CeilingStore>, viewport: Viewport, seed: u64) -> Self {
        let ceiling = read_ceiling(store.as_ref());
        log::info!("Round starting: seed {seed}, ceiling {ceiling}");
        Self {
            world: World::new(seed, ceiling, viewport),
            clock: SimClock::new(settings.speed, settings.max_ticks_per_frame),
            phase: RoundPhase::Playing,
            store,
            settings,
            epilogue: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn epilogue(&self) -> Option<&Epilogue> {
        self.epilogue.as_ref()
    }

    pub fn store(&self) -> &dyn CeilingStore {
        self.store.as_ref()
    }

    pub fn is_alive(&self) -> bool {
        self.phase != RoundPhase::Terminated
    }

    pub fn summary(&self) -> RoundSummary<'_> {
        RoundSummary {
            phase: self.phase,
            outcome: self.world.outcome(),
            score: self.world.score,
            eat_streak: self.world.eat_streak,
            max_score: self.world.max_score,
            elapsed_ms: self.world.elapsed,
            viewport: self.world.viewport,
            ornaments: &self.world.ornaments,
        }
    }

    /// Start the frame clock without running any ticks
    pub fn start(&mut self, now_ms: f64) {
        self.clock.start(now_ms);
    }

    /// Drive one animation frame at wall-clock `now_ms`.
    ///
    /// Returns the destination to navigate to when the round terminates.
    pub fn frame(&mut self, now_ms: f64) -> Option<String> {
        match self.phase {
            RoundPhase::Playing => {
                let ticks = self.clock.advance(now_ms);
                for _ in 0..ticks {
                    if let Some(outcome) = tick(&mut self.world) {
                        self.finish(outcome);
                        break;
                    }
                }
                None
            }
            RoundPhase::Won | RoundPhase::Lost => {
                self.begin_epilogue(now_ms);
                self.poll_epilogue(now_ms)
            }
            RoundPhase::Epilogue => self.poll_epilogue(now_ms),
            RoundPhase::Terminated => None,
        }
    }

    /// Handle a tap at screen coordinates
    pub fn tap(&mut self, x: f64, y: f64) -> TapResult {
        if self.phase != RoundPhase::Playing {
            return TapResult::Ignored;
        }
        let result = tap(&mut self.world, x, y);
        if let Some(outcome) = self.world.outcome() {
            self.finish(outcome);
        }
        result
    }

    /// The ornament image resolved with this aspect ratio
    pub fn correct_aspect(&mut self, aspect: f64) {
        if self.is_alive() {
            self.world.correct_aspect(aspect);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.is_alive() {
            self.world.resize(viewport);
        }
    }

    /// Stop everything. Pending epilogue steps never fire.
    pub fn terminate(&mut self) {
        if let Some(epilogue) = self.epilogue.as_mut() {
            epilogue.cancel();
        }
        self.phase = RoundPhase::Terminated;
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = match outcome {
            Outcome::Won => RoundPhase::Won,
            Outcome::Lost => RoundPhase::Lost,
        };
        log::info!(
            "Round over: {:?} with score {:.1}, streak {}",
            outcome,
            self.world.score,
            self.world.eat_streak
        );
    }

    fn begin_epilogue(&mut self, now_ms: f64) {
        let steps = match self.phase {
            RoundPhase::Won => {
                grow_ceiling(self.store.as_mut(), self.world.max_score);
                won_script(
                    self.world.score,
                    self.world.eat_streak,
                    &self.settings.win_destination,
                )
            }
            RoundPhase::Lost => lost_script(&self.settings.loss_destination),
            _ => return,
        };
        self.epilogue = Some(Epilogue::new(steps, now_ms));
        self.phase = RoundPhase::Epilogue;
    }

    fn poll_epilogue(&mut self, now_ms: f64) -> Option<String> {
        let destination = self.epilogue.as_mut()?.poll(now_ms)?;
        self.phase = RoundPhase::Terminated;
        Some(destination)
    }
}
