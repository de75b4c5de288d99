//! Color types with alpha support and CSS color parsing

use lazy_static::lazy_static;
use regex::Regex;

/// RGBA color with f32 components (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

lazy_static! {
    static ref RGB_FUNC: Regex = Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$"
    )
    .unwrap_or_else(|e| unreachable!("invalid rgb() pattern: {e}"));
}

/// CSS named colors the prompt templates and typical generators use
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xFFFFFF),
    ("red", 0xFF0000),
    ("green", 0x008000),
    ("lime", 0x00FF00),
    ("blue", 0x0000FF),
    ("yellow", 0xFFFF00),
    ("cyan", 0x00FFFF),
    ("aqua", 0x00FFFF),
    ("magenta", 0xFF00FF),
    ("fuchsia", 0xFF00FF),
    ("orange", 0xFFA500),
    ("purple", 0x800080),
    ("pink", 0xFFC0CB),
    ("brown", 0xA52A2A),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("silver", 0xC0C0C0),
    ("navy", 0x000080),
    ("teal", 0x008080),
    ("olive", 0x808000),
    ("maroon", 0x800000),
    ("gold", 0xFFD700),
    ("indigo", 0x4B0082),
    ("violet", 0xEE82EE),
    ("skyblue", 0x87CEEB),
    ("forestgreen", 0x228B22),
    ("saddlebrown", 0x8B4513),
    ("tomato", 0xFF6347),
    ("steelblue", 0x4682B4),
    ("royalblue", 0x4169E1),
    ("hotpink", 0xFF69B4),
    ("darkviolet", 0x9400D3),
];

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values (0-255)
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Create from 8-bit RGBA values (0-255)
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Create from hex color (e.g., 0xFF0000 for red)
    #[inline]
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgb8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse a CSS color string.
    ///
    /// Supports `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`,
    /// `transparent` and a table of common named colors. Case-insensitive.
    pub fn parse_css(input: &str) -> Option<Color> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex_digits(hex);
        }

        if s == "transparent" {
            return Some(Color::TRANSPARENT);
        }

        if let Some(caps) = RGB_FUNC.captures(&s) {
            let channel = |i: usize| -> Option<u8> { caps.get(i)?.as_str().parse::<u8>().ok() };
            let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
            let alpha = match caps.get(4) {
                Some(m) => m.as_str().parse::<f32>().ok()?.clamp(0.0, 1.0),
                None => 1.0,
            };
            let mut color = Color::from_rgb8(r, g, b);
            color.a = alpha;
            return Some(color);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, hex)| Color::from_hex(*hex))
    }

    /// Convert to 8-bit RGB tuple
    #[inline]
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Convert to 8-bit RGBA bytes
    #[inline]
    pub fn to_rgba8(&self) -> [u8; 4] {
        let (r, g, b) = self.to_rgb8();
        [r, g, b, (self.a.clamp(0.0, 1.0) * 255.0).round() as u8]
    }

    /// Convert to a crossterm terminal color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        let (r, g, b) = self.to_rgb8();
        crossterm::style::Color::Rgb { r, g, b }
    }

    /// Blend this color over another (alpha compositing)
    #[inline]
    pub fn blend_over(&self, bg: &Color) -> Color {
        let a = self.a + bg.a * (1.0 - self.a);
        if a < 0.0001 {
            return Color::TRANSPARENT;
        }
        Color {
            r: (self.r * self.a + bg.r * bg.a * (1.0 - self.a)) / a,
            g: (self.g * self.a + bg.g * bg.a * (1.0 - self.a)) / a,
            b: (self.b * self.a + bg.b * bg.a * (1.0 - self.a)) / a,
            a,
        }
    }

    /// Same color with alpha scaled by `coverage`
    #[inline]
    pub fn with_coverage(&self, coverage: f32) -> Color {
        Color {
            a: self.a * coverage.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Compute luminance (perceived brightness)
    #[inline]
    pub fn luminance(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Euclidean distance to another color
    #[inline]
    pub fn distance(&self, other: &Color) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

fn parse_hex_digits(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Color::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_palette_parses() {
        for css in ["#8B4513", "#228B22", "#FF69B4", "#4169E1", "#9400D3"] {
            let color = Color::parse_css(css).unwrap();
            let hex = u32::from_str_radix(&css[1..], 16).unwrap();
            assert_eq!(color, Color::from_hex(hex), "{css}");
        }
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse_css("#FFD700").map(|c| c.to_rgb8()), Some((255, 215, 0)));
        assert_eq!(Color::parse_css("#fff").map(|c| c.to_rgb8()), Some((255, 255, 255)));
        let translucent = Color::parse_css("#00000080").unwrap();
        assert!((translucent.a - 0.5).abs() < 0.01);
        assert!(Color::parse_css("#12345").is_none());
        assert!(Color::parse_css("#zzzzzz").is_none());
    }

    #[test]
    fn test_parse_rgb_function() {
        let c = Color::parse_css("rgb(10, 20, 30)").unwrap();
        assert_eq!(c.to_rgb8(), (10, 20, 30));
        let c = Color::parse_css("RGBA(255,0,0,0.25)").unwrap();
        assert!((c.a - 0.25).abs() < 0.001);
        assert!(Color::parse_css("rgb(300, 0, 0)").is_none());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse_css("Black"), Some(Color::BLACK));
        assert_eq!(Color::parse_css("white"), Some(Color::WHITE));
        assert!(Color::parse_css("not-a-color").is_none());
    }

    #[test]
    fn test_partial_coverage_over_white() {
        let edge = Color::BLACK.with_coverage(0.25).blend_over(&Color::WHITE);
        assert!((edge.r - 0.75).abs() < 1e-6);
        assert!((edge.a - 1.0).abs() < 1e-6);

        let solid = Color::parse_css("navy").unwrap().blend_over(&Color::WHITE);
        assert_eq!(solid.to_rgb8(), (0, 0, 128));
    }
}
