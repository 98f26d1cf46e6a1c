//! Canvas2D backend

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{ColorStop, Rect, Renderer};

/// Renderer over a `<canvas>` 2D context
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            images: HashMap::new(),
        })
    }

    /// Match the backing store to a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Start loading an image; it is drawable once the browser finishes
    pub fn load_image(&mut self, key: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(key);
        self.images.insert(key.to_string(), image);
        Ok(())
    }

    fn apply_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
        for stop in stops {
            if let Err(e) = gradient.add_color_stop(stop.offset, &stop.color) {
                log::warn!("Bad gradient stop {:?}: {:?}", stop, e);
            }
        }
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
    }
}

impl Renderer for CanvasRenderer {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: &str, line_width: f32) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn radial_gradient_circle(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius.max(0.0) as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) else {
            return;
        };
        Self::apply_stops(&gradient, stops);
        self.circle_path(center, radius);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill();
    }

    fn linear_gradient_rect(&mut self, rect: Rect, from: Vec2, to: Vec2, stops: &[ColorStop]) {
        let gradient = self
            .ctx
            .create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64);
        Self::apply_stops(&gradient, stops);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn draw_image(&mut self, key: &str, center: Vec2, max_size: f32) -> bool {
        let Some(image) = self.images.get(key) else {
            return false;
        };
        if !image.complete() || image.natural_width() == 0 || image.natural_height() == 0 {
            return false;
        }
        // Fit inside max_size keeping the aspect ratio
        let aspect = image.natural_width() as f64 / image.natural_height() as f64;
        let max = max_size as f64;
        let (w, h) = if aspect > 1.0 {
            (max, max / aspect)
        } else {
            (max * aspect, max)
        };
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                center.x as f64 - w / 2.0,
                center.y as f64 - h / 2.0,
                w,
                h,
            )
            .is_ok()
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, color: &str, font: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }
}
