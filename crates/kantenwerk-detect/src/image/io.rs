// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image I/O: decode from disk, memory or raw pixel buffers, and write back.
// Failures from the `image` crate are mapped onto `KantenwerkError`.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use kantenwerk_core::error::{KantenwerkError, Result};
use tracing::{debug, info, instrument};

/// Load an image from a file path.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        KantenwerkError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img)
}

/// Decode raw encoded bytes (JPEG, PNG, etc.).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(data).map_err(|err| {
        KantenwerkError::ImageError(format!("failed to decode image: {}", err))
    })?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    Ok(img)
}

/// Wrap a packed, row-major pixel buffer without decoding.
///
/// `channels` is 1 (gray), 3 (RGB) or 4 (RGBA); `data` must hold exactly
/// `width * height * channels` bytes.
pub fn image_from_raw(data: &[u8], width: u32, height: u32, channels: u8) -> Result<DynamicImage> {
    if !matches!(channels, 1 | 3 | 4) {
        return Err(KantenwerkError::UnsupportedChannels(channels));
    }
    let expected = width as usize * height as usize * channels as usize;
    if data.len() != expected {
        return Err(KantenwerkError::InvalidBuffer {
            expected,
            actual: data.len(),
        });
    }

    let buffer = data.to_vec();
    let image = match channels {
        1 => GrayImage::from_raw(width, height, buffer).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgb8),
        _ => RgbaImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgba8),
    };
    image.ok_or(KantenwerkError::InvalidBuffer {
        expected,
        actual: data.len(),
    })
}

/// Write the image to a file. The format is inferred from the file extension.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref()).map_err(|err| {
        KantenwerkError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

/// Encode as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| KantenwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn raw_rgb_roundtrips_pixels() {
        let data: Vec<u8> = (0..2 * 3 * 3).map(|v| v as u8).collect();
        let img = image_from_raw(&data, 2, 3, 3).expect("valid buffer");
        let rgb = img.as_rgb8().expect("rgb variant");
        assert_eq!(rgb.dimensions(), (2, 3));
        assert_eq!(*rgb.get_pixel(1, 0), Rgb([3, 4, 5]));
    }

    #[test]
    fn raw_buffer_length_is_checked() {
        let err = image_from_raw(&[0u8; 10], 2, 2, 3).unwrap_err();
        assert!(matches!(
            err,
            KantenwerkError::InvalidBuffer {
                expected: 12,
                actual: 10
            }
        ));
    }

    #[test]
    fn raw_channel_count_is_checked() {
        assert!(matches!(
            image_from_raw(&[0u8; 8], 2, 2, 2),
            Err(KantenwerkError::UnsupportedChannels(2))
        ));
    }

    #[test]
    fn png_bytes_decode_back() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 5, Rgb([10, 20, 30])));
        let bytes = encode_png(&img).expect("encode");
        let back = decode_image(&bytes).expect("decode");
        assert_eq!((back.width(), back.height()), (7, 5));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(KantenwerkError::ImageError(_))
        ));
    }

    #[test]
    fn save_and_open_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.png");
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
        save_image(&img, &path).expect("save");
        let back = open_image(&path).expect("open");
        assert_eq!(back.to_rgb8().get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(open_image("/nonexistent/page.png").is_err());
    }
}
