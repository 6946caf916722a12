use image::{ImageFormat, RgbImage};
use thiserror::Error;

/// Límite de subida y de decodificación (16 MiB).
pub const MAX_IMAGE_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("Image data is empty")]
    EmptyData,

    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Bytes crudos (JPEG/PNG/WebP/...) -> imagen RGB de 8 bits.
/// El formato se detecta por los magic bytes, nunca por el nombre del fichero.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<RgbImage, ImageDecodeError> {
    if bytes.is_empty() {
        return Err(ImageDecodeError::EmptyData);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageDecodeError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageDecodeError::DecodeFailed(e.to_string()))?;

    Ok(img.to_rgb8())
}

pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageDecodeError> {
    image::guess_format(bytes).map_err(|_| ImageDecodeError::UnsupportedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, image::Rgb([10, 20, 30]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_png() {
        let rgb = decode_image_bytes(&png_bytes(8, 5)).unwrap();
        assert_eq!(rgb.dimensions(), (8, 5));
        assert_eq!(rgb.get_pixel(3, 3).0, [10, 20, 30]);
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert!(matches!(decode_image_bytes(&[]), Err(ImageDecodeError::EmptyData)));
    }

    #[test]
    fn text_is_not_an_image() {
        assert!(matches!(
            decode_image_bytes(b"definitely not an image"),
            Err(ImageDecodeError::UnsupportedFormat)
        ));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let bytes = png_bytes(32, 32);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(decode_image_bytes(truncated), Err(ImageDecodeError::DecodeFailed(_))));
    }

    #[test]
    fn oversized_payload_is_rejected_before_decoding() {
        let mut bytes = vec![0u8; MAX_IMAGE_SIZE + 1];
        bytes[..4].copy_from_slice(&[0x89, 0x50, 0x4E, 0x47]);
        assert!(matches!(decode_image_bytes(&bytes), Err(ImageDecodeError::TooLarge(_, _))));
    }
}
