//! Kitty Graphics Protocol rasterizer
//!
//! Sends the canvas as a PNG image for pixel-perfect previews.
//! Supported by: Kitty, WezTerm, Ghostty
//!
//! Protocol: <https://sw.kovidgoyal.net/kitty/graphics-protocol/>

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::warn;

use super::canvas::Canvas;
use super::caps::TerminalCaps;
use super::rasterizer::{RasterOutput, Rasterizer};

/// Payload bytes per escape sequence chunk
const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Default)]
pub struct KittyRasterizer;

impl KittyRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Build the escape sequences for a base64 PNG payload.
    ///
    /// The first chunk carries `a=T` (transmit and display) and `f=100`
    /// (PNG); `m=1` marks that more chunks follow.
    fn build_sequence(b64: &str, width: u32, height: u32) -> String {
        let chunks: Vec<&[u8]> = b64.as_bytes().chunks(CHUNK_SIZE).collect();
        let last = chunks.len().saturating_sub(1);
        let mut result = String::with_capacity(b64.len() + chunks.len() * 32);

        for (i, chunk) in chunks.iter().enumerate() {
            // base64 output is ASCII, so any byte split is valid UTF-8
            let payload = String::from_utf8_lossy(chunk);
            let more = u8::from(i != last);
            result.push_str("\x1b_G");
            if i == 0 {
                result.push_str(&format!("a=T,f=100,q=2,s={width},v={height},m={more};{payload}"));
            } else {
                result.push_str(&format!("m={more};{payload}"));
            }
            result.push_str("\x1b\\");
        }

        result
    }
}

impl Rasterizer for KittyRasterizer {
    fn rasterize(&self, canvas: &Canvas, _caps: &TerminalCaps) -> RasterOutput {
        match canvas.to_png() {
            Ok(png) => {
                let b64 = BASE64.encode(png);
                RasterOutput::Escape(Self::build_sequence(&b64, canvas.width, canvas.height))
            }
            Err(e) => {
                warn!("Skipping Kitty frame: {}", e);
                RasterOutput::Escape(String::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        "Kitty"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitty_sequence_generation() {
        let canvas = Canvas::new(10, 10);
        let output = KittyRasterizer::new().rasterize(&canvas, &TerminalCaps::default());

        let RasterOutput::Escape(seq) = output else {
            panic!("Expected Escape output");
        };
        assert!(seq.starts_with("\x1b_Ga=T,f=100,q=2,s=10,v=10,m=0;"));
        assert!(seq.ends_with("\x1b\\"));
    }

    #[test]
    fn test_long_payload_is_chunked() {
        let payload = "A".repeat(CHUNK_SIZE + 1);
        let seq = KittyRasterizer::build_sequence(&payload, 1, 1);
        assert_eq!(seq.matches("\x1b_G").count(), 2);
        assert!(seq.contains(",m=1;"));
        assert!(seq.contains("\x1b_Gm=0;A\x1b\\"));
    }
}
