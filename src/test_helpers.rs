//! Shared test utilities for the decolgen test suite.
//!
//! Images are generated in memory instead of shipped as fixture files, so
//! each test states the exact pixels it starts from.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let red = solid_image(8, 8, [255, 0, 0, 255]);
//! let png = encode_fixture(&red, image::ImageFormat::Png);
//! let path = write_fixture(&tmp, "red.png", &png);
//! ```

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

// =========================================================================
// Rasters
// =========================================================================

/// Every pixel set to `rgba`.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Opaque diagonal gradient. Neighbouring pixels differ, so resampling,
/// blurring, and sharpening all have something to act on.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 255 / (width + height).max(1)) as u8;
        Rgba([r, g, b, 255])
    })
}

// =========================================================================
// Encoded fixtures
// =========================================================================

/// Encode a raster with the `image` crate's own encoders.
///
/// JPEG has no alpha channel, so the raster is dropped to RGB first.
pub fn encode_fixture(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let dynamic = DynamicImage::ImageRgba8(image.clone());
    let dynamic = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        _ => dynamic,
    };
    let mut buf = Vec::new();
    dynamic
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap_or_else(|e| panic!("encoding {format:?} fixture failed: {e}"));
    buf
}

/// Write `bytes` as `name` inside the temp directory and return the path.
pub fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
