//! Terminal capability detection for drawing previews

use std::env;

/// Graphics protocol supported by terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsProtocol {
    /// Kitty Graphics Protocol, PNG payloads
    Kitty,
    /// No graphics support, use half blocks
    #[default]
    None,
}

/// Terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCaps {
    /// Terminal columns
    pub cols: u16,
    /// Terminal rows
    pub rows: u16,
    /// Graphics protocol support
    pub graphics: GraphicsProtocol,
    /// Terminal name/type
    pub term_name: String,
}

impl Default for TerminalCaps {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            graphics: GraphicsProtocol::None,
            term_name: String::new(),
        }
    }
}

impl TerminalCaps {
    /// Detect terminal capabilities
    pub fn detect() -> Self {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        Self {
            cols,
            rows,
            graphics: detect_graphics_protocol(),
            term_name: env::var("TERM").unwrap_or_default(),
        }
    }

    /// Half-block grid `(cols, rows)` that fits a `width` x `height` image.
    ///
    /// Each cell holds two vertically stacked samples, so the grid keeps the
    /// image's aspect ratio with roughly square samples. Two rows are left
    /// free for the prompt.
    pub fn halfblock_grid(&self, width: u32, height: u32) -> (u16, u16) {
        if width == 0 || height == 0 {
            return (0, 0);
        }
        let max_rows = u32::from(self.rows.saturating_sub(2).max(1));
        let mut cols = u32::from(self.cols).min(width).max(1);
        let mut rows = (cols * height).div_ceil(width * 2).max(1);
        if rows > max_rows {
            rows = max_rows;
            cols = ((rows * 2 * width) / height).clamp(1, u32::from(self.cols).max(1));
        }
        (cols as u16, rows as u16)
    }
}

fn detect_graphics_protocol() -> GraphicsProtocol {
    if env::var("KITTY_WINDOW_ID").is_ok() || env::var("WEZTERM_PANE").is_ok() {
        return GraphicsProtocol::Kitty;
    }

    if env::var("TERM").is_ok_and(|t| t.contains("kitty")) {
        return GraphicsProtocol::Kitty;
    }

    match env::var("TERM_PROGRAM").as_deref() {
        Ok("WezTerm" | "Ghostty") => GraphicsProtocol::Kitty,
        _ => GraphicsProtocol::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_caps() {
        let caps = TerminalCaps::default();
        assert_eq!(caps.cols, 80);
        assert_eq!(caps.rows, 24);
        assert_eq!(caps.graphics, GraphicsProtocol::None);
    }

    #[test]
    fn test_halfblock_grid_keeps_aspect() {
        let caps = TerminalCaps::default();
        // 800x600 at 80 columns: 60 samples tall, capped at 22 rows
        let (cols, rows) = caps.halfblock_grid(800, 600);
        assert_eq!(rows, 22);
        assert_eq!(cols, 58);

        let wide = TerminalCaps {
            cols: 40,
            rows: 100,
            ..TerminalCaps::default()
        };
        assert_eq!(wide.halfblock_grid(800, 400), (40, 10));
    }

    #[test]
    fn test_halfblock_grid_small_image() {
        let caps = TerminalCaps::default();
        assert_eq!(caps.halfblock_grid(10, 4), (10, 2));
        assert_eq!(caps.halfblock_grid(0, 4), (0, 0));
    }
}
