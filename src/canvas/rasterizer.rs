//! Rasterizer trait for converting a canvas to terminal output

use std::io::Write;

use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::QueueableCommand;

use super::canvas::Canvas;
use super::caps::{GraphicsProtocol, TerminalCaps};
use super::halfblock::HalfBlockRasterizer;
use super::kitty::KittyRasterizer;

/// Output from rasterizer
#[derive(Debug, Clone)]
pub enum RasterOutput {
    /// Raw escape sequence (Kitty)
    Escape(String),
    /// Lines of styled cells
    Lines(Vec<StyledLine>),
}

impl RasterOutput {
    /// Terminal rows the output occupies once written
    pub fn height(&self) -> u16 {
        match self {
            RasterOutput::Escape(_) => 0,
            RasterOutput::Lines(lines) => lines.len() as u16,
        }
    }

    /// Write the output with colors to `out`
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self {
            RasterOutput::Escape(seq) => {
                out.queue(Print(seq))?;
                out.queue(Print("\r\n"))?;
            }
            RasterOutput::Lines(lines) => {
                for line in lines {
                    for cell in &line.cells {
                        out.queue(SetForegroundColor(cell.fg))?;
                        out.queue(SetBackgroundColor(cell.bg))?;
                        out.queue(Print(cell.ch))?;
                    }
                    out.queue(ResetColor)?;
                    out.queue(Print("\r\n"))?;
                }
            }
        }
        out.flush()
    }
}

/// A single terminal cell with foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub fg: crossterm::style::Color,
    pub bg: crossterm::style::Color,
}

/// A line of styled cells
#[derive(Debug, Clone)]
pub struct StyledLine {
    pub cells: Vec<StyledCell>,
}

/// Converts a canvas into something a terminal can show
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, canvas: &Canvas, caps: &TerminalCaps) -> RasterOutput;

    fn name(&self) -> &'static str;
}

/// Select the best rasterizer for the given terminal
pub fn select_rasterizer(caps: &TerminalCaps) -> Box<dyn Rasterizer> {
    match caps.graphics {
        GraphicsProtocol::Kitty => Box::new(KittyRasterizer::new()),
        GraphicsProtocol::None => Box::new(HalfBlockRasterizer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_rasterizer() {
        let mut caps = TerminalCaps::default();
        assert_eq!(select_rasterizer(&caps).name(), "HalfBlock");
        caps.graphics = GraphicsProtocol::Kitty;
        assert_eq!(select_rasterizer(&caps).name(), "Kitty");
    }

    #[test]
    fn test_lines_write_one_row_per_line() {
        let canvas = Canvas::new(4, 4);
        let caps = TerminalCaps {
            cols: 4,
            rows: 10,
            ..TerminalCaps::default()
        };
        let output = HalfBlockRasterizer::new().rasterize(&canvas, &caps);
        assert_eq!(output.height(), 2);

        let mut buf = Vec::new();
        output.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("\r\n").count(), 2);
    }
}
