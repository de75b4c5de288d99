//! Drawing surface capability
//!
//! Every operation receives its full style explicitly. A surface keeps no
//! current fill, stroke or font between calls, so the outcome of a call never
//! depends on what was drawn before it.

use super::shapes::{Point, Rect};
use super::Color;
use crate::command::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH};
use crate::errors::Result;

/// Outline style for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(Color::BLACK, DEFAULT_LINE_WIDTH)
    }
}

/// Fill style for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Font selection for one text call
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: String,
}

impl Font {
    pub fn new(size: f64, family: &str) -> Self {
        Self {
            size,
            family: family.to_string(),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE, DEFAULT_FONT_FAMILY)
    }
}

/// 2D raster target the renderer draws on.
///
/// Coordinates and sizes are surface-local units; no conversion happens
/// between a command and the surface.
pub trait DrawingSurface {
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill);

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: &Stroke);

    fn fill_rect(&mut self, rect: Rect, fill: &Fill);

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke);

    fn fill_triangle(&mut self, vertices: [Point; 3], fill: &Fill);

    fn stroke_triangle(&mut self, vertices: [Point; 3], stroke: &Stroke);

    /// Draw `text` with its baseline starting at `origin`
    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, fill: &Fill);

    /// Fill the whole surface white and drop anything drawn so far
    fn reset(&mut self);

    /// Encode the current contents as an embeddable image
    fn export_image(&self) -> Result<String>;

    /// Change the surface size, then [`reset`](Self::reset)
    fn resize(&mut self, width: u32, height: u32);

    /// Current `(width, height)`
    fn size(&self) -> (u32, u32);

    /// Animated playback starts (`true`) or ends (`false`)
    fn set_live(&mut self, _live: bool) {}
}
