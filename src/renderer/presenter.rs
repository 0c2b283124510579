//! Presenter: round state to draw calls
//!
//! Pure function of the round and the asset resolver. Owns nothing.

use super::Surface;
use crate::assets::AssetResolver;
use crate::consts::SCORE_BAR_HEIGHT;
use crate::epilogue::Reveal;
use crate::round::{GameRound, RoundPhase};
use crate::sim::World;

const BAR_COLOR: &str = "#ddd";
const SCORE_FONT: &str = "48pt sans";
const SCORE_COLOR: &str = "#888";
const STREAK_FONT: &str = "24pt sans";
const STREAK_COLOR: &str = "#666";
const BACKDROP_COLOR: &str = "#fff";

/// Draw one frame
pub fn render<S: Surface>(surface: &mut S, round: &GameRound, assets: &AssetResolver<S::Image>) {
    match round.phase() {
        RoundPhase::Playing | RoundPhase::Won | RoundPhase::Lost => {
            draw_playfield(surface, round.world(), assets);
        }
        RoundPhase::Epilogue => {
            if let Some(epilogue) = round.epilogue() {
                draw_epilogue(surface, epilogue.revealed(), assets);
            }
        }
        RoundPhase::Terminated => {}
    }
}

/// Draw `text` centred on (x, y)
pub fn draw_centered_text<S: Surface>(surface: &mut S, x: f64, y: f64, text: &str, font: &str, color: &str) {
    let metrics = surface.measure_text(text, font);
    surface.fill_text(text, x - 0.5 * metrics.width, y - 0.5 * metrics.descent, font, color);
}

fn draw_playfield<S: Surface>(surface: &mut S, world: &World, assets: &AssetResolver<S::Image>) {
    surface.clear();
    let (w, h) = surface.size();
    let (cx, cy) = (0.5 * w, 0.5 * h);

    surface.fill_rect(0.0, 0.0, w * (world.score / world.max_score), SCORE_BAR_HEIGHT, BAR_COLOR);

    if world.score != 0.0 {
        let score = world.score.trunc() as i64;
        draw_centered_text(surface, cx, cy, &score.to_string(), SCORE_FONT, SCORE_COLOR);
    }
    if world.eat_streak > 1 {
        let streak = format!("x{}", world.eat_streak);
        draw_centered_text(surface, cx, cy + 50.0, &streak, STREAK_FONT, STREAK_COLOR);
    }

    // Ornaments live in simulation space, scaled back down by the pixel ratio
    let inv_ratio = 1.0 / world.viewport.pixel_ratio;
    for ornament in &world.ornaments {
        surface.push_transform();
        surface.scale(inv_ratio, inv_ratio);
        surface.translate(ornament.pos.x, ornament.pos.y);
        surface.rotate(ornament.rotation);
        surface.translate(-ornament.origin.x, -ornament.origin.y);
        assets.draw(surface, 0.0, 0.0, ornament.width, ornament.size);
        surface.pop_transform();
    }
}

fn draw_epilogue<S: Surface>(surface: &mut S, revealed: &[Reveal], assets: &AssetResolver<S::Image>) {
    surface.clear();
    let (w, h) = surface.size();
    let (cx, cy) = (0.5 * w, 0.5 * h);

    for reveal in revealed {
        match reveal {
            Reveal::Backdrop => surface.fill_rect(0.0, 0.0, w, h, BACKDROP_COLOR),
            Reveal::Text {
                text,
                dx,
                dy,
                font,
                color,
            } => draw_centered_text(surface, cx + dx, cy + dy, text, font, color),
            Reveal::Badge { dx, dy, w, h } => assets.draw(surface, cx + dx, cy + dy, *w, *h),
        }
    }
}
