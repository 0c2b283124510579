//! Rendering module
//!
//! The game draws through a small 2D surface trait. The browser build backs
//! it with a canvas 2D context; tests use a recording fake.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod presenter;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use presenter::render;

/// Text extents needed to centre a string
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub descent: f64,
}

/// A 2D drawing surface
pub trait Surface {
    /// Bitmap type this surface can draw
    type Image;

    /// Surface size in its own pixels
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, w: f64, h: f64);
    fn measure_text(&mut self, text: &str, font: &str) -> TextMetrics;
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str);

    /// Save the current transform
    fn push_transform(&mut self);
    /// Restore the last saved transform
    fn pop_transform(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, sx: f64, sy: f64);
}
