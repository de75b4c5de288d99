//! Canvas that repaints itself in the terminal.
//!
//! While an animated playback runs, every draw call writes a frame. Outside
//! playback nothing is written until [`PreviewSurface::present`]. Terminal
//! write failures never interrupt drawing; they are logged and the preview
//! goes quiet.

use std::io::Write;

use crossterm::cursor::MoveUp;
use crossterm::QueueableCommand;
use tracing::{debug, warn};

use super::canvas::Canvas;
use super::caps::TerminalCaps;
use super::rasterizer::{select_rasterizer, Rasterizer};
use super::shapes::{Point, Rect};
use super::surface::{DrawingSurface, Fill, Font, Stroke};
use crate::errors::Result;

pub struct PreviewSurface<W: Write> {
    canvas: Canvas,
    caps: TerminalCaps,
    rasterizer: Box<dyn Rasterizer>,
    out: W,
    /// Rows written by the last frame, to overwrite in place
    last_height: u16,
    frames: usize,
    failed: bool,
    /// Present after each draw call
    live: bool,
}

impl<W: Write> PreviewSurface<W> {
    pub fn new(canvas: Canvas, caps: TerminalCaps, out: W) -> Self {
        let rasterizer = select_rasterizer(&caps);
        debug!(rasterizer = rasterizer.name(), "Terminal preview enabled");
        Self {
            canvas,
            caps,
            rasterizer,
            out,
            last_height: 0,
            frames: 0,
            failed: false,
            live: false,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Frames written so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Write the current canvas to the terminal
    pub fn present(&mut self) {
        if self.failed {
            return;
        }
        if let Err(e) = self.write_frame() {
            warn!("Terminal preview disabled: {}", e);
            self.failed = true;
        }
    }

    fn after_draw(&mut self) {
        if self.live {
            self.present();
        }
    }

    fn write_frame(&mut self) -> std::io::Result<()> {
        let output = self.rasterizer.rasterize(&self.canvas, &self.caps);
        if self.last_height > 0 {
            self.out.queue(MoveUp(self.last_height))?;
        }
        output.write_to(&mut self.out)?;
        self.last_height = output.height();
        self.canvas.mark_clean();
        self.frames += 1;
        Ok(())
    }
}

impl<W: Write> DrawingSurface for PreviewSurface<W> {
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.canvas.stroke_line(from, to, stroke);
        self.after_draw();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
        self.canvas.fill_circle(center, radius, fill);
        self.after_draw();
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) {
        self.canvas.stroke_circle(center, radius, stroke);
        self.after_draw();
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.canvas.fill_rect(rect, fill);
        self.after_draw();
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.canvas.stroke_rect(rect, stroke);
        self.after_draw();
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], fill: &Fill) {
        self.canvas.fill_triangle(vertices, fill);
        self.after_draw();
    }

    fn stroke_triangle(&mut self, vertices: [Point; 3], stroke: &Stroke) {
        self.canvas.stroke_triangle(vertices, stroke);
        self.after_draw();
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, fill: &Fill) {
        self.canvas.draw_text(origin, text, font, fill);
        self.after_draw();
    }

    fn reset(&mut self) {
        self.canvas.reset();
    }

    fn export_image(&self) -> Result<String> {
        self.canvas.export_image()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    fn set_live(&mut self, live: bool) {
        self.live = live;
        if !live && self.canvas.is_dirty() {
            self.present();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    fn small_caps() -> TerminalCaps {
        TerminalCaps {
            cols: 8,
            rows: 10,
            ..TerminalCaps::default()
        }
    }

    #[test]
    fn test_plain_draws_write_nothing() {
        let mut preview = PreviewSurface::new(Canvas::new(8, 8), small_caps(), Vec::new());
        preview.reset();
        preview.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &Fill::new(Color::RED));
        preview.fill_circle(Point::new(4.0, 4.0), 2.0, &Fill::new(Color::BLUE));
        assert_eq!(preview.frames(), 0);
        assert!(preview.out.is_empty());

        preview.present();
        assert_eq!(preview.frames(), 1);
    }

    #[test]
    fn test_live_draws_write_a_frame_each() {
        let mut preview = PreviewSurface::new(Canvas::new(8, 8), small_caps(), Vec::new());
        preview.reset();
        preview.set_live(true);
        preview.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &Fill::new(Color::RED));
        preview.fill_circle(Point::new(4.0, 4.0), 2.0, &Fill::new(Color::BLUE));
        assert_eq!(preview.frames(), 2);

        // Last frame is already on screen
        preview.set_live(false);
        assert_eq!(preview.frames(), 2);
        assert!(!preview.canvas().is_blank());
    }

    #[tokio::test]
    async fn test_render_presents_once_and_playback_per_command() {
        use crate::command::Command;
        use crate::engine::{render, Animator};

        let commands = vec![
            Command::rect(0.0, 0.0, 4.0, 4.0, "red"),
            Command::circle(4.0, 4.0, 2.0, "blue"),
            Command::line(0.0, 0.0, 8.0, 8.0, "black"),
        ];
        let mut preview = PreviewSurface::new(Canvas::new(8, 8), small_caps(), Vec::new());

        render(&mut preview, &commands);
        assert_eq!(preview.frames(), 0);
        preview.present();
        assert_eq!(preview.frames(), 1);

        Animator::new(std::time::Duration::ZERO)
            .play(&mut preview, &commands)
            .await;
        assert_eq!(preview.frames(), 4);
    }

    #[test]
    fn test_frames_overwrite_in_place() {
        let mut preview = PreviewSurface::new(Canvas::new(8, 8), small_caps(), Vec::new());
        preview.present();
        preview.present();
        let text = String::from_utf8(preview.out.clone()).unwrap();
        // Second frame moves up over the first: ESC [ 4 A
        assert_eq!(text.matches("\x1b[4A").count(), 1);
    }
}
