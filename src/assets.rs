//! Ornament image resolution with ordered fallback
//!
//! The host loads one candidate source at a time and reports back. The
//! resolver walks the list on failure and settles either on a bitmap or on
//! a permanent solid-colour placeholder. Failures are never surfaced.

use crate::renderer::Surface;

/// Seasonal image, only offered during `SEASONAL_MONTH`
pub const RAINBOW_SOURCE: &str = "https://raw.githubusercontent.com/NixOS/nixos-artwork/refs/heads/master/logo/nix-snowflake-rainbow.svg";
pub const COLOURS_SOURCE: &str = "https://raw.githubusercontent.com/NixOS/nixos-artwork/refs/heads/master/logo/nix-snowflake-colours.svg";
pub const WIKIMEDIA_SOURCE: &str = "https://upload.wikimedia.org/wikipedia/commons/2/28/Nix_snowflake.svg";
/// Shipped next to the page, always last
pub const BUNDLED_SOURCE: &str = "./generic_snowflake.svg";

/// Calendar month (1 = January) that gets the seasonal image
pub const SEASONAL_MONTH: u32 = 6;

/// Candidate list in load order
pub fn ornament_sources(custom: Option<&str>, month: u32) -> Vec<String> {
    let mut sources = Vec::with_capacity(5);
    if let Some(custom) = custom {
        sources.push(custom.to_string());
    }
    if month == SEASONAL_MONTH {
        sources.push(RAINBOW_SOURCE.to_string());
    }
    sources.extend([COLOURS_SOURCE, WIKIMEDIA_SOURCE, BUNDLED_SOURCE].map(String::from));
    sources
}

/// Intrinsic dimensions reported once a source loads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetReady {
    pub width: f64,
    pub height: f64,
}

impl AssetReady {
    /// Width / height, `None` for images without usable intrinsic size
    pub fn aspect(&self) -> Option<f64> {
        let aspect = self.width / self.height;
        (aspect.is_finite() && aspect > 0.0).then_some(aspect)
    }
}

#[derive(Debug, Clone)]
enum AssetState<B> {
    /// Waiting on `sources[index]`
    Loading { index: usize },
    Ready { bitmap: B },
    /// Every source failed
    Exhausted,
}

/// Resolves one logical image from an ordered list of sources
#[derive(Debug, Clone)]
pub struct AssetResolver<B> {
    sources: Vec<String>,
    fallback_color: String,
    state: AssetState<B>,
}

impl<B> AssetResolver<B> {
    pub fn new(sources: Vec<String>, fallback_color: impl Into<String>) -> Self {
        let state = if sources.is_empty() {
            AssetState::Exhausted
        } else {
            AssetState::Loading { index: 0 }
        };
        Self {
            sources,
            fallback_color: fallback_color.into(),
            state,
        }
    }

    /// Source the host should be loading right now
    pub fn current_source(&self) -> Option<&str> {
        match self.state {
            AssetState::Loading { index } => self.sources.get(index).map(String::as_str),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AssetState::Ready { .. })
    }

    pub fn bitmap(&self) -> Option<&B> {
        match &self.state {
            AssetState::Ready { bitmap } => Some(bitmap),
            _ => None,
        }
    }

    /// The current source loaded.
    ///
    /// Returns the readiness notification the first time only; late or
    /// duplicate loads return `None` and leave the resolver unchanged.
    pub fn loaded(&mut self, bitmap: B, width: f64, height: f64) -> Option<AssetReady> {
        let AssetState::Loading { index } = self.state else {
            return None;
        };
        log::info!("Ornament image ready from {}", self.sources[index]);
        self.state = AssetState::Ready { bitmap };
        Some(AssetReady { width, height })
    }

    /// The current source failed. Returns the next source to try.
    pub fn failed(&mut self) -> Option<&str> {
        let AssetState::Loading { index } = self.state else {
            return None;
        };
        log::debug!("Image source {} failed", self.sources[index]);
        let next = index + 1;
        if next < self.sources.len() {
            self.state = AssetState::Loading { index: next };
            self.current_source()
        } else {
            log::warn!("All {} image sources failed, using placeholder", self.sources.len());
            self.state = AssetState::Exhausted;
            None
        }
    }

    /// Draw the image scaled to (w, h), or the placeholder fill
    pub fn draw<S>(&self, surface: &mut S, x: f64, y: f64, w: f64, h: f64)
    where
        S: Surface<Image = B>,
    {
        match self.bitmap() {
            Some(bitmap) => surface.draw_image(bitmap, x, y, w, h),
            None => surface.fill_rect(x, y, w, h, &self.fallback_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AssetResolver<&'static str> {
        AssetResolver::new(vec!["a".into(), "b".into(), "c".into()], "#000")
    }

    #[test]
    fn test_sources_outside_season() {
        let sources = ornament_sources(None, 12);
        assert_eq!(sources, vec![COLOURS_SOURCE, WIKIMEDIA_SOURCE, BUNDLED_SOURCE]);
    }

    #[test]
    fn test_sources_in_season_with_custom() {
        let sources = ornament_sources(Some("mine.png"), SEASONAL_MONTH);
        assert_eq!(sources[0], "mine.png");
        assert_eq!(sources[1], RAINBOW_SOURCE);
        assert_eq!(sources.last().map(String::as_str), Some(BUNDLED_SOURCE));
        assert_eq!(sources.len(), 5);
    }

    #[test]
    fn test_falls_back_in_order() {
        let mut r = resolver();
        assert_eq!(r.current_source(), Some("a"));
        assert_eq!(r.failed(), Some("b"));
        assert_eq!(r.failed(), Some("c"));
        let ready = r.loaded("bitmap-c", 200.0, 100.0);
        assert_eq!(ready.and_then(|d| d.aspect()), Some(2.0));
        assert_eq!(r.bitmap(), Some(&"bitmap-c"));
    }

    #[test]
    fn test_ready_fires_once() {
        let mut r = resolver();
        assert!(r.loaded("x", 10.0, 10.0).is_some());
        assert!(r.loaded("y", 10.0, 10.0).is_none());
        assert_eq!(r.bitmap(), Some(&"x"));
        assert_eq!(r.failed(), None);
        assert!(r.is_ready());
    }

    #[test]
    fn test_exhaustion_is_permanent() {
        let mut r = resolver();
        r.failed();
        r.failed();
        assert_eq!(r.failed(), None);
        assert!(matches!(r.state, AssetState::Exhausted));
        assert_eq!(r.current_source(), None);
        assert!(r.loaded("late", 1.0, 1.0).is_none());
        assert!(!r.is_ready());
    }

    #[test]
    fn test_zero_sized_image_has_no_aspect() {
        let ready = AssetReady { width: 0.0, height: 0.0 };
        assert_eq!(ready.aspect(), None);
    }
}
