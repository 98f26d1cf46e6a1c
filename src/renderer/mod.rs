//! 2D raster rendering
//!
//! The scene is drawn through the [`Renderer`] trait so it can be exercised
//! without a browser. On wasm the trait is backed by a Canvas2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{SceneOptions, draw_frame};

use glam::Vec2;

/// Gradient color stop; `offset` is in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f32, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Drawing surface
///
/// Colors are CSS color strings. Every call draws at the current global alpha.
pub trait Renderer {
    /// Surface size in pixels
    fn size(&self) -> (f32, f32);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: &str, line_width: f32);
    /// Circle filled with a gradient radiating from its center
    fn radial_gradient_circle(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]);
    /// Rectangle filled with a gradient running from `from` to `to`
    fn linear_gradient_rect(&mut self, rect: Rect, from: Vec2, to: Vec2, stops: &[ColorStop]);
    /// Draw a loaded image centered on `center`, fitted inside `max_size`
    ///
    /// Returns false when the image is not available yet.
    fn draw_image(&mut self, key: &str, center: Vec2, max_size: f32) -> bool;
    fn fill_text(&mut self, text: &str, pos: Vec2, color: &str, font: &str);
    fn set_alpha(&mut self, alpha: f32);
}
