//! `HalfBlock` rasterizer, the universal fallback using ▀▄█ characters
//!
//! Each terminal cell represents 2 vertical samples:
//! - ▀ (upper half block): top = fg, bottom = bg
//! - ▄ (lower half block): top = bg, bottom = fg
//! - █ (full block): both = fg

use crossterm::style::Color as TermColor;

use super::canvas::Canvas;
use super::caps::TerminalCaps;
use super::color::Color;
use super::rasterizer::{RasterOutput, Rasterizer, StyledCell, StyledLine};

/// Half-block rasterizer
#[derive(Debug, Default)]
pub struct HalfBlockRasterizer;

impl HalfBlockRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn rasterize_to_cells(&self, canvas: &Canvas, cols: u16, rows: u16) -> Vec<StyledLine> {
        if cols == 0 || rows == 0 || canvas.width == 0 || canvas.height == 0 {
            return Vec::new();
        }

        let scale_x = f64::from(canvas.width) / f64::from(cols);
        let scale_y = f64::from(canvas.height) / (f64::from(rows) * 2.0);
        let sample = |x: f64, y: f64| {
            let px = (x as u32).min(canvas.width - 1);
            let py = (y as u32).min(canvas.height - 1);
            canvas.get_pixel(px, py).unwrap_or(Color::WHITE)
        };

        (0..rows)
            .map(|row| {
                let top_y = f64::from(row) * 2.0 * scale_y;
                let bot_y = (f64::from(row) * 2.0 + 1.0) * scale_y;
                let cells = (0..cols)
                    .map(|col| {
                        let x = f64::from(col) * scale_x;
                        let (ch, fg, bg) = select_halfblock(&sample(x, top_y), &sample(x, bot_y));
                        StyledCell { ch, fg, bg }
                    })
                    .collect();
                StyledLine { cells }
            })
            .collect()
    }
}

/// Pick the glyph and colors for a top/bottom sample pair
fn select_halfblock(top: &Color, bot: &Color) -> (char, TermColor, TermColor) {
    if top.distance(bot) < 0.1 {
        let avg = Color::rgb(
            (top.r + bot.r) / 2.0,
            (top.g + bot.g) / 2.0,
            (top.b + bot.b) / 2.0,
        );
        return ('█', avg.to_crossterm(), avg.to_crossterm());
    }

    if top.luminance() >= bot.luminance() {
        ('▀', top.to_crossterm(), bot.to_crossterm())
    } else {
        ('▄', bot.to_crossterm(), top.to_crossterm())
    }
}

impl Rasterizer for HalfBlockRasterizer {
    fn rasterize(&self, canvas: &Canvas, caps: &TerminalCaps) -> RasterOutput {
        let (cols, rows) = caps.halfblock_grid(canvas.width, canvas.height);
        RasterOutput::Lines(self.rasterize_to_cells(canvas, cols, rows))
    }

    fn name(&self) -> &'static str {
        "HalfBlock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawingSurface, Fill, Rect};

    #[test]
    fn test_similar_colors_use_full_block() {
        let top = Color::rgb(0.5, 0.5, 0.5);
        let bot = Color::rgb(0.51, 0.51, 0.51);
        let (ch, _, _) = select_halfblock(&top, &bot);
        assert_eq!(ch, '█');
    }

    #[test]
    fn test_different_colors_use_half_block() {
        let (ch, fg, bg) = select_halfblock(&Color::WHITE, &Color::BLACK);
        assert_eq!(ch, '▀');
        assert_eq!(fg, TermColor::Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(bg, TermColor::Rgb { r: 0, g: 0, b: 0 });

        let (ch, _, _) = select_halfblock(&Color::BLACK, &Color::WHITE);
        assert_eq!(ch, '▄');
    }

    #[test]
    fn test_grid_samples_canvas() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(Rect::new(0.0, 2.0, 4.0, 2.0), &Fill::new(Color::BLACK));
        let lines = HalfBlockRasterizer::new().rasterize_to_cells(&canvas, 4, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].cells.iter().all(|c| c.fg == TermColor::Rgb { r: 255, g: 255, b: 255 }));
        assert!(lines[1].cells.iter().all(|c| c.fg == TermColor::Rgb { r: 0, g: 0, b: 0 }));
    }
}
