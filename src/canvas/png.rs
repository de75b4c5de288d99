//! PNG export

use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{ImageFormat, RgbaImage};

use crate::errors::{DrawError, Result};

/// Encode row-major RGBA bytes as a PNG file.
///
/// `rgba.len()` must be exactly `width * height * 4`.
pub fn encode_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        DrawError::InvalidInput(Arc::new(format!(
            "pixel buffer does not hold a {width}x{height} RGBA image"
        )))
    })?;

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Encode as a `data:image/png;base64,...` URL
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_survive_encoding() {
        let rgba = vec![255, 0, 0, 255, 0, 0, 128, 255];
        let png = encode_rgba(rgba.clone(), 2, 1).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.into_raw(), rgba);
    }

    #[test]
    fn test_flat_image_is_compressed() {
        let raw = vec![255u8; 200 * 200 * 4];
        let png = encode_rgba(raw.clone(), 200, 200).unwrap();
        assert!(png.len() * 20 < raw.len(), "{} bytes", png.len());
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        assert!(matches!(
            encode_rgba(vec![0; 12], 2, 2),
            Err(DrawError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_data_url_prefix() {
        assert!(to_data_url(&[1, 2, 3]).starts_with("data:image/png;base64,"));
    }
}
