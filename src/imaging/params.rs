//! Parameter types for the transform pipeline.
//!
//! [`TransformParameters`] describes *what* to do to an image. The
//! [`backend`](super::backend) decides *how*. Each adjustment has an identity
//! value at which its step is skipped entirely:
//!
//! | Field | Identity | Valid range |
//! |---|---|---|
//! | `width`, `height` | source dimensions | > 0 |
//! | `blur` | 0.0 | 0..=[`MAX_SIGMA`] |
//! | `sharpen` | 0.0 | 0..=[`MAX_SIGMA`] |
//! | `gamma` | 1.0 | > 0, finite |
//! | `contrast` | 0 | clamped to -100..=100 |
//! | `brightness` | 0 | clamped to -100..=100 |
//! | `saturation` | 0 | clamped to -100..=500 |
//! | `invert` | false | |
//!
//! The output raster may hold at most [`MAX_OUTPUT_PIXELS`] pixels; callers
//! can lower that with [`TransformParameters::validate_within`]. Both caps are
//! checked before any pixel is allocated.
//!
//! Requests arriving from a UI deserialize from JSON with the field names the
//! editor form uses (`sharpening` rather than `sharpen`).

use super::backend::BackendError;
use super::format::ResampleFilter;
use serde::{Deserialize, Serialize};

/// Largest output raster: 100 megapixels, 400 MB as RGBA8.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Largest blur radius or sharpen amount. The Gaussian kernel grows with sigma.
pub const MAX_SIGMA: f64 = 100.0;

/// Immutable description of one pass through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformParameters {
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub filter: ResampleFilter,
    #[serde(default)]
    pub blur: f64,
    #[serde(default, rename = "sharpening")]
    pub sharpen: f64,
    #[serde(default = "identity_gamma")]
    pub gamma: f64,
    #[serde(default)]
    pub contrast: i32,
    #[serde(default)]
    pub brightness: i32,
    #[serde(default)]
    pub saturation: i32,
    #[serde(default)]
    pub invert: bool,
}

fn identity_gamma() -> f64 {
    1.0
}

// Serialized as the selector string so requests round-trip through JSON.
impl Serialize for ResampleFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.selector())
    }
}

impl<'de> Deserialize<'de> for ResampleFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let selector = String::deserialize(deserializer)?;
        Ok(ResampleFilter::from(selector))
    }
}

impl TransformParameters {
    /// Parameters that leave a `width`×`height` image untouched.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            width: i64::from(width),
            height: i64::from(height),
            filter: ResampleFilter::default(),
            blur: 0.0,
            sharpen: 0.0,
            gamma: 1.0,
            contrast: 0,
            brightness: 0,
            saturation: 0,
            invert: false,
        }
    }

    /// Parse a UI request body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values no step can honour. Called before any pixel work.
    pub fn validate(&self) -> Result<(), BackendError> {
        self.validate_within(MAX_OUTPUT_PIXELS)
    }

    /// [`validate`](Self::validate) with a tighter output ceiling.
    pub fn validate_within(&self, max_output_pixels: u64) -> Result<(), BackendError> {
        let (width, height) = self.target_dimensions()?;
        let pixels = u64::from(width) * u64::from(height);
        let limit = max_output_pixels.min(MAX_OUTPUT_PIXELS);
        if pixels > limit {
            return Err(BackendError::InvalidParameter(format!(
                "output {width}x{height} ({pixels} pixels) exceeds the limit of {limit} pixels"
            )));
        }
        check_sigma("blur", self.blur)?;
        check_sigma("sharpening", self.sharpen)?;
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(BackendError::InvalidParameter(format!(
                "gamma must be a finite value > 0, got {}",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Target size as pixel dimensions. Non-positive or oversized values are rejected.
    pub fn target_dimensions(&self) -> Result<(u32, u32), BackendError> {
        let width = positive_dimension("width", self.width)?;
        let height = positive_dimension("height", self.height)?;
        Ok((width, height))
    }

    /// Whether every photometric step is at its identity value.
    pub fn is_photometric_identity(&self) -> bool {
        self.blur == 0.0
            && self.sharpen == 0.0
            && self.gamma == 1.0
            && self.contrast == 0
            && self.brightness == 0
            && self.saturation == 0
            && !self.invert
    }
}

fn check_sigma(name: &str, value: f64) -> Result<(), BackendError> {
    if !value.is_finite() || !(0.0..=MAX_SIGMA).contains(&value) {
        return Err(BackendError::InvalidParameter(format!(
            "{name} must be between 0 and {MAX_SIGMA}, got {value}"
        )));
    }
    Ok(())
}

fn positive_dimension(name: &str, value: i64) -> Result<u32, BackendError> {
    if value <= 0 {
        return Err(BackendError::InvalidParameter(format!(
            "{name} must be greater than 0, got {value}"
        )));
    }
    u32::try_from(value).map_err(|_| {
        BackendError::InvalidParameter(format!("{name} {value} exceeds the supported maximum"))
    })
}
