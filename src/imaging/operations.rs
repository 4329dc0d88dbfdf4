//! High-level image operations.
//!
//! These functions combine parameter validation with backend execution. They
//! work on bytes already in memory; reading and writing files is the job of
//! the [`edit`](crate::edit) layer.

use super::backend::{BackendError, ImageBackend};
use super::format::EncodedFormat;
use super::params::TransformParameters;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, bytes: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(bytes)?;
    Ok((dims.width, dims.height))
}

/// Decode, transform, and encode in one call.
///
/// Parameters are validated before anything is decoded, so a bad request
/// never pays for a decode. Nothing partial is returned: any failing step
/// fails the whole render.
pub fn render_image(
    backend: &impl ImageBackend,
    bytes: &[u8],
    params: &TransformParameters,
    format: EncodedFormat,
) -> Result<Vec<u8>> {
    params.validate()?;
    let image = backend.decode(bytes)?;
    let image = backend.transform(image, params)?;
    backend.encode(&image, format)
}
