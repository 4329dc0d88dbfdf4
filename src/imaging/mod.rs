//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Decode** | `image::load_from_memory` → RGBA8 |
//! | **Transform** | `imageops::{resize, blur}` + lookup-table tone curves |
//! | **Encode** | JPEG / PNG / GIF / BMP / TIFF encoders from `image::codecs` |
//!
//! The module is split into:
//! - **Format**: extension → [`EncodedFormat`], selector → [`ResampleFilter`]
//! - **Parameters**: [`TransformParameters`] and its validation
//! - **Calculations**: Pure per-channel math (unit testable)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining validation + backend

pub mod backend;
mod calculations;
pub mod format;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, RasterImage};
pub use format::{
    EncodedFormat, ResampleFilter, is_known_extension, resolve_format, resolve_format_with,
};
pub use operations::{get_dimensions, render_image};
pub use params::{MAX_OUTPUT_PIXELS, MAX_SIGMA, TransformParameters};
pub use rust_backend::RustBackend;
