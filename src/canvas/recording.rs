//! Surface that records calls instead of drawing

use super::shapes::{Point, Rect};
use super::surface::{DrawingSurface, Fill, Font, Stroke};
use crate::errors::Result;

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    StrokeLine { from: Point, to: Point, stroke: Stroke },
    FillCircle { center: Point, radius: f64, fill: Fill },
    StrokeCircle { center: Point, radius: f64, stroke: Stroke },
    FillRect { rect: Rect, fill: Fill },
    StrokeRect { rect: Rect, stroke: Stroke },
    FillTriangle { vertices: [Point; 3], fill: Fill },
    StrokeTriangle { vertices: [Point; 3], stroke: Stroke },
    Text { origin: Point, text: String, font: Font, fill: Fill },
    Reset,
    Resize { width: u32, height: u32 },
}

impl SurfaceCall {
    /// Whether the call puts paint on the surface
    pub fn is_draw(&self) -> bool {
        !matches!(self, SurfaceCall::Reset | SurfaceCall::Resize { .. })
    }
}

/// Keeps every call in order; useful to check what a renderer asked for
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Calls that put paint on the surface
    pub fn draw_calls(&self) -> Vec<&SurfaceCall> {
        self.calls.iter().filter(|c| c.is_draw()).collect()
    }

    pub fn reset_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == SurfaceCall::Reset).count()
    }

    /// Draw calls made since the last reset
    pub fn draws_since_reset(&self) -> usize {
        self.calls
            .iter()
            .rev()
            .take_while(|c| **c != SurfaceCall::Reset)
            .filter(|c| c.is_draw())
            .count()
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }
}

impl DrawingSurface for RecordingSurface {
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.calls.push(SurfaceCall::StrokeLine {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
        self.calls.push(SurfaceCall::FillCircle {
            center,
            radius,
            fill: *fill,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) {
        self.calls.push(SurfaceCall::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.calls.push(SurfaceCall::FillRect { rect, fill: *fill });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.calls.push(SurfaceCall::StrokeRect {
            rect,
            stroke: *stroke,
        });
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], fill: &Fill) {
        self.calls.push(SurfaceCall::FillTriangle {
            vertices,
            fill: *fill,
        });
    }

    fn stroke_triangle(&mut self, vertices: [Point; 3], stroke: &Stroke) {
        self.calls.push(SurfaceCall::StrokeTriangle {
            vertices,
            stroke: *stroke,
        });
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, fill: &Fill) {
        self.calls.push(SurfaceCall::Text {
            origin,
            text: text.to_string(),
            font: font.clone(),
            fill: *fill,
        });
    }

    fn reset(&mut self) {
        self.calls.push(SurfaceCall::Reset);
    }

    fn export_image(&self) -> Result<String> {
        Ok(format!(
            "recording:{}x{}:{}",
            self.width,
            self.height,
            self.calls.len()
        ))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.calls.push(SurfaceCall::Resize { width, height });
        self.reset();
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.fill_circle(Point::new(1.0, 1.0), 2.0, &Fill::new(Color::RED));
        surface.reset();
        surface.stroke_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), &Stroke::default());

        assert_eq!(surface.calls().len(), 3);
        assert_eq!(surface.reset_count(), 1);
        assert_eq!(surface.draws_since_reset(), 1);
        assert_eq!(surface.draw_calls().len(), 2);
    }

    #[test]
    fn test_resize_logs_reset() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.resize(20, 5);
        assert_eq!(surface.size(), (20, 5));
        assert_eq!(surface.reset_count(), 1);
    }
}
