//! Raster canvas with float coordinates and RGBA pixels

use sha2::{Digest, Sha256};
use tracing::warn;

use super::color::Color;
use super::png;
use super::shapes::{Circle, Line, Point, Polygon, Rect, Shape, TextRun};
use super::surface::{DrawingSurface, Fill, Font, Stroke};
use crate::errors::Result;

/// Largest width or height a canvas accepts; larger requests are clamped
pub const MAX_DIMENSION: u32 = 4096;

fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        warn!(width, height, max = MAX_DIMENSION, "Canvas size clamped");
    }
    (width.min(MAX_DIMENSION), height.min(MAX_DIMENSION))
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Virtual framebuffer canvas
///
/// Coordinates are continuous (f64), not discrete.
/// Pixels are RGBA with alpha compositing.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel data (row-major, RGBA)
    pixels: Vec<Color>,
    /// Background color
    bg_color: Color,
    /// Dirty flag for incremental previews
    dirty: bool,
}

impl Canvas {
    /// Create a new canvas with a white background
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Color::WHITE)
    }

    /// Create canvas with background color
    pub fn with_background(width: u32, height: u32, bg: Color) -> Self {
        let (width, height) = clamp_size(width, height);
        Self {
            width,
            height,
            pixels: vec![bg; pixel_count(width, height)],
            bg_color: bg,
            dirty: true,
        }
    }

    /// Clear canvas to background color
    pub fn clear(&mut self) {
        self.pixels.fill(self.bg_color);
        self.dirty = true;
    }

    /// Get pixel at coordinates
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Set pixel at coordinates
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
            self.dirty = true;
        }
    }

    /// Draw a shape onto the canvas
    pub fn draw<S: Shape>(&mut self, shape: &S) {
        shape.rasterize(self.width, self.height, &mut self.pixels);
        self.dirty = true;
    }

    /// Get raw pixel data
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Check if canvas is dirty
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark canvas as clean
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Whether every pixel still has the background color
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == self.bg_color)
    }

    /// Flatten to row-major RGBA bytes
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(Color::to_rgba8).collect()
    }

    /// Encode the canvas as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        png::encode_rgba(self.to_rgba8(), self.width, self.height)
    }

    /// SHA-256 of the size and 8-bit pixel data, hex encoded.
    ///
    /// Two canvases with the same fingerprint look identical.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_be_bytes());
        hasher.update(self.height.to_be_bytes());
        hasher.update(self.to_rgba8());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

impl DrawingSurface for Canvas {
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.draw(&Line::new(from, to, stroke.color).with_width(stroke.width));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
        self.draw(&Circle::filled(center, radius, fill.color));
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) {
        self.draw(&Circle::outlined(center, radius, stroke.color, stroke.width));
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.draw(&Polygon::rectangle(rect, fill.color));
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.draw(&Polygon::rectangle(rect, stroke.color).stroked(stroke.width));
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], fill: &Fill) {
        self.draw(&Polygon::triangle(vertices, fill.color));
    }

    fn stroke_triangle(&mut self, vertices: [Point; 3], stroke: &Stroke) {
        self.draw(&Polygon::triangle(vertices, stroke.color).stroked(stroke.width));
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, fill: &Fill) {
        self.draw(&TextRun {
            origin,
            text: text.to_string(),
            size: font.size,
            color: fill.color,
        });
    }

    fn reset(&mut self) {
        self.bg_color = Color::WHITE;
        self.clear();
    }

    fn export_image(&self) -> Result<String> {
        Ok(png::to_data_url(&self.to_png()?))
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_size(width, height);
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::WHITE; pixel_count(width, height)];
        self.reset();
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas() {
        let canvas = Canvas::new(100, 50);
        assert_eq!(canvas.width, 100);
        assert_eq!(canvas.height, 50);
        assert_eq!(canvas.pixels.len(), 5000);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_oversized_canvas_is_clamped() {
        let mut canvas = Canvas::new(70_000, 10);
        assert_eq!(canvas.size(), (MAX_DIMENSION, 10));
        assert_eq!(canvas.pixels.len(), MAX_DIMENSION as usize * 10);

        canvas.resize(20, 70_000);
        assert_eq!(canvas.size(), (20, MAX_DIMENSION));
        canvas.set_pixel(19, MAX_DIMENSION - 1, Color::RED);
        assert_eq!(canvas.get_pixel(19, MAX_DIMENSION - 1), Some(Color::RED));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut canvas = Canvas::new(10, 10);
        canvas.set_pixel(5, 5, Color::RED);
        assert_eq!(canvas.get_pixel(5, 5), Some(Color::RED));
        assert_eq!(canvas.get_pixel(10, 0), None);
    }

    #[test]
    fn test_reset_restores_white_background() {
        let mut canvas = Canvas::with_background(10, 10, Color::BLUE);
        canvas.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), &Fill::new(Color::RED));
        canvas.reset();
        assert!(canvas.pixels().iter().all(|p| *p == Color::WHITE));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut a = Canvas::new(8, 8);
        let b = Canvas::new(8, 8);
        assert_eq!(a.fingerprint(), b.fingerprint());
        a.fill_circle(Point::new(4.0, 4.0), 2.0, &Fill::new(Color::BLACK));
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_resize_resets() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_pixel(1, 1, Color::RED);
        canvas.resize(6, 3);
        assert_eq!(canvas.size(), (6, 3));
        assert_eq!(canvas.pixels().len(), 18);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_export_is_png_data_url() {
        let canvas = Canvas::new(2, 2);
        let url = canvas.export_image().unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_text_draws_glyph_pixels() {
        let mut canvas = Canvas::new(40, 20);
        canvas.draw_text(
            Point::new(2.0, 16.0),
            "HI",
            &Font::new(16.0, "Arial"),
            &Fill::new(Color::BLACK),
        );
        assert!(!canvas.is_blank());
        // Left stem of the H: column 0 of the glyph, two units per font row
        assert_eq!(canvas.get_pixel(2, 3), Some(Color::BLACK));
    }
}
