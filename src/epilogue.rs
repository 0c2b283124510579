//! End-of-round epilogue
//!
//! A fixed list of `(delay, effect)` steps played back against wall-clock
//! time once the simulation has stopped. Each delay is measured from the
//! previous step. The last step leaves the application.

/// Something drawn on the end screen. Offsets are relative to the canvas centre.
#[derive(Debug, Clone, PartialEq)]
pub enum Reveal {
    /// Clear the screen to white
    Backdrop,
    Text {
        text: String,
        dx: f64,
        dy: f64,
        font: &'static str,
        color: &'static str,
    },
    /// The ornament image (or its placeholder)
    Badge { dx: f64, dy: f64, w: f64, h: f64 },
}

impl Reveal {
    fn text(text: impl Into<String>, dx: f64, dy: f64, font: &'static str, color: &'static str) -> Self {
        Reveal::Text {
            text: text.into(),
            dx,
            dy,
            font,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EpilogueEffect {
    Reveal(Reveal),
    /// Terminal: leave for this destination
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpilogueStep {
    /// Milliseconds after the previous step
    pub delay_ms: f64,
    pub effect: EpilogueEffect,
}

impl EpilogueStep {
    fn now(reveal: Reveal) -> Self {
        Self::after(0.0, reveal)
    }

    fn after(delay_ms: f64, reveal: Reveal) -> Self {
        Self {
            delay_ms,
            effect: EpilogueEffect::Reveal(reveal),
        }
    }

    fn navigate(delay_ms: f64, destination: &str) -> Self {
        Self {
            delay_ms,
            effect: EpilogueEffect::Navigate(destination.to_string()),
        }
    }
}

const CAPTION_FONT: &str = "36pt sans-serif";
const BODY_FONT: &str = "24pt sans-serif";
const COUNTDOWN_FONT: &str = "30pt sans-serif";
const BRAND_FONT: &str = "48pt sans-serif";
const TEXT_COLOR: &str = "#777";
const BRAND_COLOR: &str = "#666";

/// Win screen: caption, streak (only with a non-zero score), closing line,
/// then leave after 3.5 s
pub fn won_script(score: f64, eat_streak: u32, destination: &str) -> Vec<EpilogueStep> {
    let mut steps = vec![
        EpilogueStep::now(Reveal::Backdrop),
        EpilogueStep::now(Reveal::text("you win.", 15.0, 0.0, CAPTION_FONT, TEXT_COLOR)),
    ];
    if score != 0.0 {
        steps.push(EpilogueStep::now(Reveal::text(
            format!("x{eat_streak}"),
            0.0,
            60.0,
            BODY_FONT,
            TEXT_COLOR,
        )));
    }
    steps.push(EpilogueStep::now(Reveal::text(
        "enjoy your prize.",
        0.0,
        120.0,
        BODY_FONT,
        TEXT_COLOR,
    )));
    steps.push(EpilogueStep::navigate(3500.0, destination));
    steps
}

/// Loss screen: message and brand, then a countdown, then leave
pub fn lost_script(destination: &str) -> Vec<EpilogueStep> {
    vec![
        EpilogueStep::now(Reveal::Backdrop),
        EpilogueStep::now(Reveal::text("you lose.", 15.0, 0.0, CAPTION_FONT, TEXT_COLOR)),
        EpilogueStep::now(Reveal::text(
            "and now required to install",
            0.0,
            50.0,
            BODY_FONT,
            TEXT_COLOR,
        )),
        EpilogueStep::now(Reveal::text("NixOS", -40.0, 140.0, BRAND_FONT, BRAND_COLOR)),
        EpilogueStep::now(Reveal::Badge {
            dx: 65.0,
            dy: 40.0,
            w: 100.0,
            h: 100.0,
        }),
        EpilogueStep::after(
            2000.0,
            Reveal::text("starting in...", -140.0, 230.0, COUNTDOWN_FONT, TEXT_COLOR),
        ),
        EpilogueStep::after(1000.0, Reveal::text("1...", 0.0, 280.0, COUNTDOWN_FONT, TEXT_COLOR)),
        EpilogueStep::after(1000.0, Reveal::text("2...", 40.0, 330.0, COUNTDOWN_FONT, TEXT_COLOR)),
        EpilogueStep::after(1000.0, Reveal::text("3...", 90.0, 380.0, COUNTDOWN_FONT, TEXT_COLOR)),
        EpilogueStep::navigate(500.0, destination),
    ]
}

/// Plays an epilogue script against an injected clock
#[derive(Debug, Clone)]
pub struct Epilogue {
    steps: Vec<EpilogueStep>,
    next: usize,
    /// Time the previous step was due
    anchor_ms: f64,
    alive: bool,
    revealed: Vec<Reveal>,
}

impl Epilogue {
    pub fn new(steps: Vec<EpilogueStep>, start_ms: f64) -> Self {
        Self {
            steps,
            next: 0,
            anchor_ms: start_ms,
            alive: true,
            revealed: Vec::new(),
        }
    }

    /// Run every step that is due at `now_ms`.
    ///
    /// Returns the destination once the navigation step fires. Cancelled or
    /// finished epilogues do nothing.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        while self.alive {
            let step = self.steps.get(self.next)?;
            let due = self.anchor_ms + step.delay_ms;
            if now_ms < due {
                return None;
            }
            self.anchor_ms = due;
            self.next += 1;
            match &step.effect {
                EpilogueEffect::Reveal(reveal) => {
                    log::debug!("Epilogue step {}: {:?}", self.next, reveal);
                    self.revealed.push(reveal.clone());
                }
                EpilogueEffect::Navigate(destination) => {
                    log::info!("Epilogue finished, leaving for {destination}");
                    self.alive = false;
                    return Some(destination.clone());
                }
            }
        }
        None
    }

    /// Stop the script. Pending steps never fire.
    pub fn cancel(&mut self) {
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Everything shown so far, in order
    pub fn revealed(&self) -> &[Reveal] {
        &self.revealed
    }
}
