//! Canvas 2D backend (WASM only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Surface, TextMetrics};

/// `Surface` over an `HtmlCanvasElement`'s 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("get_context failed: {e:?}"))?
            .ok_or_else(|| anyhow::anyhow!("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow::anyhow!("context is not CanvasRenderingContext2d"))?;
        Ok(Self { canvas, ctx })
    }

    /// Match the canvas backing size to the viewport
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
        if let Err(e) = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
        {
            log::debug!("draw_image failed: {e:?}");
        }
    }

    fn measure_text(&mut self, text: &str, font: &str) -> TextMetrics {
        self.ctx.set_font(font);
        match self.ctx.measure_text(text) {
            Ok(m) => TextMetrics {
                width: m.width(),
                descent: m.actual_bounding_box_descent(),
            },
            Err(_) => TextMetrics::default(),
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn push_transform(&mut self) {
        self.ctx.save();
    }

    fn pop_transform(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        let _ = self.ctx.translate(x, y);
    }

    fn rotate(&mut self, radians: f64) {
        let _ = self.ctx.rotate(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let _ = self.ctx.scale(sx, sy);
    }
}
