//! Platform abstraction layer
//!
//! Browser glue for time, viewport size, calendar month and navigation.
//! Native builds have no browser, so only the pure helpers exist there.

use crate::sim::Viewport;

/// Canvas backing size for a viewport, in whole pixels
pub fn canvas_size(viewport: &Viewport) -> (u32, u32) {
    (
        viewport.width.max(0.0).floor() as u32,
        viewport.height.max(0.0).floor() as u32,
    )
}

/// Seed a round from a wall-clock timestamp
pub fn seed_from_time(now_ms: f64) -> u64 {
    now_ms.max(0.0) as u64
}

#[cfg(target_arch = "wasm32")]
mod web {
    use anyhow::{Context, Result};

    use crate::sim::Viewport;

    fn window() -> Result<web_sys::Window> {
        web_sys::window().context("no window")
    }

    /// Milliseconds since the epoch
    pub fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    /// Current calendar month, 1 = January
    pub fn current_month() -> u32 {
        js_sys::Date::new_0().get_month() + 1
    }

    /// Full-window viewport in CSS pixels
    pub fn viewport() -> Result<Viewport> {
        let window = window()?;
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .context("inner_width unavailable")?;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .context("inner_height unavailable")?;
        let ratio = window.device_pixel_ratio();
        let ratio = if ratio > 0.0 { ratio } else { 1.0 };
        Ok(Viewport::new(width, height, ratio))
    }

    /// Leave the application
    pub fn navigate(destination: &str) {
        let result = window().and_then(|w| {
            w.location()
                .set_href(destination)
                .map_err(|e| anyhow::anyhow!("navigation failed: {e:?}"))
        });
        if let Err(e) = result {
            log::error!("Could not navigate to {destination}: {e:#}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{current_month, navigate, now_ms, viewport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_truncates() {
        assert_eq!(canvas_size(&Viewport::new(1023.7, 767.2, 2.0)), (1023, 767));
        assert_eq!(canvas_size(&Viewport::new(-5.0, 10.0, 1.0)), (0, 10));
    }

    #[test]
    fn test_seed_from_time() {
        assert_eq!(seed_from_time(1_700_000_000_123.9), 1_700_000_000_123);
        assert_eq!(seed_from_time(-1.0), 0);
    }
}
