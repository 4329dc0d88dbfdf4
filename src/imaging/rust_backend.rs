//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` |
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, ICO, WebP) | `image::load_from_memory` → RGBA8 |
//! | Resize | `image::imageops::resize` with the selected [`ResampleFilter`] |
//! | Blur | `image::imageops::blur` (Gaussian, sigma = radius) |
//! | Sharpen | Gaussian blur + unsharp combine from [`calculations`](super::calculations) |
//! | Gamma / contrast / brightness | 256-entry lookup tables |
//! | Saturation | HSL round trip per pixel |
//! | Encode | `image::codecs::{jpeg, png, gif, bmp, tiff}` encoders |
//!
//! ## Pipeline order
//!
//! Resize → blur → sharpen → gamma → contrast → brightness → saturation →
//! invert. The order is fixed. Each step at its identity value is skipped, so
//! an identity request returns the decoded pixels untouched. Photometric steps
//! touch color channels only; alpha passes through.
//!
//! Blur and sharpen below [`MIN_SIGMA`] are skipped too. A Gaussian that
//! narrow has no weight outside the centre pixel, and `imageops::blur` returns
//! an all-zero buffer for it instead of the source.

use super::backend::{BackendError, Dimensions, ImageBackend, RasterImage};
use super::calculations::{
    ChannelLut, brightness_lut, contrast_lut, gamma_lut, invert_channel, saturate,
    saturation_factor, sharpen_channel,
};
use super::format::{EncodedFormat, ResampleFilter};
use super::params::TransformParameters;
use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ExtendedColorType, Frame, ImageEncoder, ImageReader, RgbImage, imageops};
use std::io::Cursor;

/// Smallest sigma that yields a usable Gaussian kernel.
pub const MIN_SIGMA: f64 = 0.01;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn resize(image: RasterImage, width: u32, height: u32, filter: ResampleFilter) -> RasterImage {
    if image.dimensions() == (width, height) {
        log::trace!("resize skipped: already {width}x{height}");
        return image;
    }
    log::debug!(
        "resize {}x{} -> {width}x{height} ({})",
        image.width(),
        image.height(),
        filter.selector()
    );
    imageops::resize(&image, width, height, filter.filter_type())
}

fn blur(image: RasterImage, radius: f64) -> RasterImage {
    if radius < MIN_SIGMA {
        log::trace!("blur skipped: sigma {radius}");
        return image;
    }
    log::debug!("blur sigma={radius}");
    imageops::blur(&image, radius as f32)
}

fn sharpen(mut image: RasterImage, amount: f64) -> RasterImage {
    if amount < MIN_SIGMA {
        log::trace!("sharpen skipped: amount {amount}");
        return image;
    }
    log::debug!("sharpen amount={amount}");
    let blurred = imageops::blur(&image, amount as f32);
    for (pixel, soft) in image.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            pixel[c] = sharpen_channel(pixel[c], soft[c]);
        }
    }
    image
}

fn apply_lut(image: &mut RasterImage, lut: &ChannelLut) {
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = lut[pixel[c] as usize];
        }
    }
}

fn adjust_gamma(mut image: RasterImage, gamma: f64) -> RasterImage {
    if gamma == 1.0 {
        log::trace!("gamma skipped");
        return image;
    }
    log::debug!("gamma {gamma}");
    apply_lut(&mut image, &gamma_lut(gamma));
    image
}

fn adjust_contrast(mut image: RasterImage, delta: i32) -> RasterImage {
    if delta == 0 {
        log::trace!("contrast skipped");
        return image;
    }
    log::debug!("contrast {delta:+}");
    apply_lut(&mut image, &contrast_lut(delta));
    image
}

fn adjust_brightness(mut image: RasterImage, delta: i32) -> RasterImage {
    if delta == 0 {
        log::trace!("brightness skipped");
        return image;
    }
    log::debug!("brightness {delta:+}");
    apply_lut(&mut image, &brightness_lut(delta));
    image
}

fn adjust_saturation(mut image: RasterImage, delta: i32) -> RasterImage {
    if delta == 0 {
        log::trace!("saturation skipped");
        return image;
    }
    log::debug!("saturation {delta:+}");
    let factor = saturation_factor(delta);
    for pixel in image.pixels_mut() {
        let [r, g, b] = saturate([pixel[0], pixel[1], pixel[2]], factor);
        pixel[0] = r;
        pixel[1] = g;
        pixel[2] = b;
    }
    image
}

fn invert(mut image: RasterImage, enabled: bool) -> RasterImage {
    if !enabled {
        log::trace!("invert skipped");
        return image;
    }
    log::debug!("invert");
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = invert_channel(pixel[c]);
        }
    }
    image
}

/// Composite over black for formats without an alpha channel.
fn flatten_alpha(image: &RasterImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let a = u16::from(p[3]);
        let premultiply = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
        image::Rgb([premultiply(p[0]), premultiply(p[1]), premultiply(p[2])])
    })
}

fn encode_error(format: EncodedFormat, e: image::ImageError) -> BackendError {
    BackendError::Encode(format!("{format} encoding failed: {e}"))
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(format!("Failed to read image header: {e}")))?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(format!("Failed to read dimensions: {e}")))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| BackendError::Decode(format!("Failed to decode image: {e}")))?;
        log::debug!(
            "decoded {}x{} {:?}",
            decoded.width(),
            decoded.height(),
            decoded.color()
        );
        Ok(decoded.into_rgba8())
    }

    fn transform(
        &self,
        image: RasterImage,
        params: &TransformParameters,
    ) -> Result<RasterImage, BackendError> {
        params.validate()?;
        let (width, height) = params.target_dimensions()?;

        let image = resize(image, width, height, params.filter);
        let image = blur(image, params.blur);
        let image = sharpen(image, params.sharpen);
        let image = adjust_gamma(image, params.gamma);
        let image = adjust_contrast(image, params.contrast);
        let image = adjust_brightness(image, params.brightness);
        let image = adjust_saturation(image, params.saturation);
        Ok(invert(image, params.invert))
    }

    fn encode(&self, image: &RasterImage, format: EncodedFormat) -> Result<Vec<u8>, BackendError> {
        let (width, height) = image.dimensions();
        let mut buf = Vec::new();

        match format {
            EncodedFormat::Jpeg => {
                let rgb = flatten_alpha(image);
                JpegEncoder::new(&mut buf)
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| encode_error(format, e))?;
            }
            EncodedFormat::Png => {
                PngEncoder::new(&mut buf)
                    .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| encode_error(format, e))?;
            }
            EncodedFormat::Gif => {
                // The encoder writes the GIF trailer when dropped.
                let mut encoder = GifEncoder::new(&mut buf);
                encoder
                    .encode_frame(Frame::new(image.clone()))
                    .map_err(|e| encode_error(format, e))?;
            }
            EncodedFormat::Bmp => {
                BmpEncoder::new(&mut buf)
                    .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| encode_error(format, e))?;
            }
            EncodedFormat::Tiff => {
                TiffEncoder::new(Cursor::new(&mut buf))
                    .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| encode_error(format, e))?;
            }
        }

        log::debug!("encoded {width}x{height} as {format}: {} bytes", buf.len());
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_fixture, gradient_image, solid_image};
    use image::{ImageFormat, Rgba};

    #[test]
    fn identify_reads_png_dimensions() {
        let bytes = encode_fixture(&solid_image(20, 10, [1, 2, 3, 255]), ImageFormat::Png);
        let dims = RustBackend::new().identify(&bytes).unwrap();
        assert_eq!(dims, Dimensions { width: 20, height: 10 });
    }

    #[test]
    fn identify_garbage_errors() {
        let result = RustBackend::new().identify(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_jpeg_to_rgba() {
        let bytes = encode_fixture(&solid_image(16, 8, [10, 200, 30, 255]), ImageFormat::Jpeg);
        let image = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(image.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn decode_truncated_png_errors() {
        let bytes = encode_fixture(&gradient_image(32, 32), ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        let result = RustBackend::new().decode(truncated);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_empty_input_errors() {
        assert!(RustBackend::new().decode(&[]).is_err());
    }

    #[test]
    fn identity_transform_is_pixel_exact() {
        let source = gradient_image(23, 17);
        let params = TransformParameters::identity(23, 17);
        let out = RustBackend::new()
            .transform(source.clone(), &params)
            .unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn transform_rejects_zero_dimensions() {
        let params = TransformParameters {
            height: 0,
            ..TransformParameters::identity(4, 4)
        };
        let result = RustBackend::new().transform(solid_image(4, 4, [0, 0, 0, 255]), &params);
        assert!(matches!(result, Err(BackendError::InvalidParameter(_))));
    }

    #[test]
    fn transform_rejects_huge_output_without_allocating() {
        let params = TransformParameters::identity(u32::MAX, u32::MAX);
        let result = RustBackend::new().transform(solid_image(2, 2, [0, 0, 0, 255]), &params);
        assert!(matches!(result, Err(BackendError::InvalidParameter(_))));
    }

    #[test]
    fn tiny_blur_leaves_solid_image_untouched() {
        let backend = RustBackend::new();
        let source = solid_image(4, 4, [10, 20, 30, 255]);
        for blur in [0.001, 0.005, 0.009] {
            let params = TransformParameters {
                blur,
                ..TransformParameters::identity(4, 4)
            };
            let out = backend.transform(source.clone(), &params).unwrap();
            assert_eq!(out, source, "blur {blur}");
        }
    }

    #[test]
    fn tiny_sharpen_leaves_solid_image_untouched() {
        let backend = RustBackend::new();
        let source = solid_image(4, 4, [10, 20, 30, 255]);
        for sharpen in [0.001, 0.002, 0.009] {
            let params = TransformParameters {
                sharpen,
                ..TransformParameters::identity(4, 4)
            };
            let out = backend.transform(source.clone(), &params).unwrap();
            assert_eq!(out, source, "sharpen {sharpen}");
        }
    }

    #[test]
    fn blur_at_min_sigma_keeps_solid_color() {
        let params = TransformParameters {
            blur: MIN_SIGMA,
            ..TransformParameters::identity(4, 4)
        };
        let out = RustBackend::new()
            .transform(solid_image(4, 4, [10, 20, 30, 255]), &params)
            .unwrap();
        assert!(out.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let backend = RustBackend::new();
        for filter in [
            ResampleFilter::Nearest,
            ResampleFilter::Linear,
            ResampleFilter::CatmullRom,
            ResampleFilter::Lanczos,
        ] {
            let params = TransformParameters {
                filter,
                ..TransformParameters::identity(7, 31)
            };
            let out = backend.transform(gradient_image(20, 20), &params).unwrap();
            assert_eq!(out.dimensions(), (7, 31), "filter {filter:?}");
        }
    }

    #[test]
    fn invert_flips_color_and_keeps_alpha() {
        let params = TransformParameters {
            invert: true,
            ..TransformParameters::identity(2, 2)
        };
        let out = RustBackend::new()
            .transform(solid_image(2, 2, [10, 20, 30, 128]), &params)
            .unwrap();
        assert_eq!(*out.get_pixel(1, 1), Rgba([245, 235, 225, 128]));
    }

    #[test]
    fn double_invert_restores_original() {
        let backend = RustBackend::new();
        let source = gradient_image(9, 9);
        let params = TransformParameters {
            invert: true,
            ..TransformParameters::identity(9, 9)
        };
        let once = backend.transform(source.clone(), &params).unwrap();
        assert_ne!(once, source);
        let twice = backend.transform(once, &params).unwrap();
        assert_eq!(twice, source);
    }

    #[test]
    fn blur_on_uniform_image_is_stable() {
        let params = TransformParameters {
            blur: 2.0,
            ..TransformParameters::identity(12, 12)
        };
        let out = RustBackend::new()
            .transform(solid_image(12, 12, [90, 90, 90, 255]), &params)
            .unwrap();
        assert_eq!(*out.get_pixel(6, 6), Rgba([90, 90, 90, 255]));
    }

    #[test]
    fn blur_softens_a_hard_edge() {
        let mut source = solid_image(20, 1, [0, 0, 0, 255]);
        for x in 10..20 {
            source.put_pixel(x, 0, Rgba([255, 255, 255, 255]));
        }
        let params = TransformParameters {
            blur: 2.0,
            ..TransformParameters::identity(20, 1)
        };
        let out = RustBackend::new().transform(source, &params).unwrap();
        let left = out.get_pixel(9, 0)[0];
        let right = out.get_pixel(10, 0)[0];
        assert!(left > 0 && left < 255, "left of edge = {left}");
        assert!(right > 0 && right < 255, "right of edge = {right}");
    }

    #[test]
    fn sharpen_increases_edge_contrast() {
        let mut source = solid_image(20, 1, [100, 100, 100, 255]);
        for x in 10..20 {
            source.put_pixel(x, 0, Rgba([150, 150, 150, 255]));
        }
        let params = TransformParameters {
            sharpen: 1.5,
            ..TransformParameters::identity(20, 1)
        };
        let out = RustBackend::new().transform(source, &params).unwrap();
        assert!(out.get_pixel(9, 0)[0] < 100);
        assert!(out.get_pixel(10, 0)[0] > 150);
        assert_eq!(out.get_pixel(10, 0)[3], 255);
    }

    #[test]
    fn brightness_clamps_instead_of_wrapping() {
        let params = TransformParameters {
            brightness: 50,
            ..TransformParameters::identity(1, 1)
        };
        let out = RustBackend::new()
            .transform(solid_image(1, 1, [250, 10, 200, 255]), &params)
            .unwrap();
        let p = out.get_pixel(0, 0);
        assert_eq!(p[0], 255);
        assert_eq!(p[2], 255);
        // 10 + 127.5
        assert_eq!(p[1], 138);
    }

    #[test]
    fn gamma_contrast_saturation_apply_in_order() {
        let params = TransformParameters {
            gamma: 2.0,
            contrast: -100,
            saturation: 50,
            ..TransformParameters::identity(1, 1)
        };
        // Contrast -100 flattens everything to mid-grey after gamma;
        // saturation then has no hue to amplify.
        let out = RustBackend::new()
            .transform(solid_image(1, 1, [12, 180, 240, 255]), &params)
            .unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn negative_saturation_desaturates() {
        let params = TransformParameters {
            saturation: -100,
            ..TransformParameters::identity(1, 1)
        };
        let out = RustBackend::new()
            .transform(solid_image(1, 1, [200, 50, 50, 255]), &params)
            .unwrap();
        let p = out.get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn encode_every_format_and_decode_back() {
        let backend = RustBackend::new();
        let source = solid_image(10, 6, [200, 30, 30, 255]);
        for format in [
            EncodedFormat::Jpeg,
            EncodedFormat::Png,
            EncodedFormat::Gif,
            EncodedFormat::Bmp,
            EncodedFormat::Tiff,
        ] {
            let bytes = backend.encode(&source, format).unwrap();
            assert_eq!(
                image::guess_format(&bytes).unwrap(),
                format.image_format(),
                "{format}"
            );
            let decoded = backend.decode(&bytes).unwrap();
            assert_eq!(decoded.dimensions(), (10, 6), "{format}");
        }
    }

    #[test]
    fn lossless_formats_round_trip_exactly() {
        let backend = RustBackend::new();
        let source = gradient_image(13, 11);
        for format in [EncodedFormat::Png, EncodedFormat::Bmp, EncodedFormat::Tiff] {
            let bytes = backend.encode(&source, format).unwrap();
            assert_eq!(backend.decode(&bytes).unwrap(), source, "{format}");
        }
    }

    #[test]
    fn encode_does_not_mutate_and_is_repeatable() {
        let backend = RustBackend::new();
        let source = gradient_image(8, 8);
        let snapshot = source.clone();
        let first = backend.encode(&source, EncodedFormat::Png).unwrap();
        let second = backend.encode(&source, EncodedFormat::Png).unwrap();
        assert_eq!(first, second);
        assert_eq!(source, snapshot);
    }

    #[test]
    fn jpeg_flattens_transparency_onto_black() {
        let rgb = flatten_alpha(&solid_image(1, 1, [200, 100, 50, 0]));
        assert_eq!(*rgb.get_pixel(0, 0), image::Rgb([0, 0, 0]));
        let rgb = flatten_alpha(&solid_image(1, 1, [200, 100, 50, 255]));
        assert_eq!(*rgb.get_pixel(0, 0), image::Rgb([200, 100, 50]));
    }
}
