//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four operations every backend must
//! support: identify, decode, transform, and encode. Everything above this
//! layer (the [`operations`](super::operations) module and the
//! [`edit`](crate::edit) use cases) is backend-agnostic, which lets the tests
//! swap in a recording mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::format::EncodedFormat;
use super::params::TransformParameters;
use thiserror::Error;

/// In-memory raster: 8-bit RGBA, row-major.
///
/// Owned by a single pipeline invocation and dropped when it completes.
pub type RasterImage = image::RgbaImage;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Read dimensions from encoded bytes without a full decode where possible.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode a complete image file into an RGBA raster.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError>;

    /// Run the fixed-order transform pipeline, consuming the input raster.
    fn transform(
        &self,
        image: RasterImage,
        params: &TransformParameters,
    ) -> Result<RasterImage, BackendError>;

    /// Serialize a raster. Must not modify `image`.
    fn encode(&self, image: &RasterImage, format: EncodedFormat) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels.
    /// Uses Mutex (not RefCell) so it is Sync.
    #[derive(Default)]
    pub struct MockBackend {
        pub decoded: Mutex<Option<Dimensions>>,
        pub encoded_bytes: Mutex<Vec<u8>>,
        pub fail_decode: bool,
        pub fail_encode: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Decode(usize),
        Transform { width: i64, height: i64, invert: bool },
        Encode(EncodedFormat),
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::with_image(Dimensions {
                width: 4,
                height: 3,
            })
        }

        /// Backend whose decode yields a blank image of `dims`.
        pub fn with_image(dims: Dimensions) -> Self {
            Self {
                decoded: Mutex::new(Some(dims)),
                encoded_bytes: Mutex::new(b"encoded".to_vec()),
                ..Self::default()
            }
        }

        pub fn failing_decode() -> Self {
            Self {
                fail_decode: true,
                ..Self::new()
            }
        }

        pub fn failing_encode() -> Self {
            Self {
                fail_encode: true,
                ..Self::new()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(bytes.len()));
            self.decoded
                .lock()
                .unwrap()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))
        }

        fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(bytes.len()));
            if self.fail_decode {
                return Err(BackendError::Decode("mock decode failure".to_string()));
            }
            let dims = self
                .decoded
                .lock()
                .unwrap()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))?;
            Ok(RasterImage::new(dims.width, dims.height))
        }

        fn transform(
            &self,
            image: RasterImage,
            params: &TransformParameters,
        ) -> Result<RasterImage, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Transform {
                width: params.width,
                height: params.height,
                invert: params.invert,
            });
            params.validate()?;
            let (width, height) = params.target_dimensions()?;
            if (width, height) == image.dimensions() {
                Ok(image)
            } else {
                Ok(RasterImage::new(width, height))
            }
        }

        fn encode(
            &self,
            _image: &RasterImage,
            format: EncodedFormat,
        ) -> Result<Vec<u8>, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Encode(format));
            if self.fail_encode {
                return Err(BackendError::Encode("mock encode failure".to_string()));
            }
            Ok(self.encoded_bytes.lock().unwrap().clone())
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockBackend::with_image(Dimensions {
            width: 800,
            height: 600,
        });

        let image = backend.decode(&[1, 2, 3]).unwrap();
        assert_eq!(image.dimensions(), (800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Decode(3)]);
    }

    #[test]
    fn mock_records_transform_and_validates() {
        let backend = MockBackend::new();
        let image = RasterImage::new(4, 3);

        let bad = TransformParameters {
            width: 0,
            ..TransformParameters::identity(4, 3)
        };
        assert!(backend.transform(image.clone(), &bad).is_err());

        let resized = backend
            .transform(image, &TransformParameters::identity(8, 6))
            .unwrap();
        assert_eq!(resized.dimensions(), (8, 6));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[1],
            RecordedOp::Transform {
                width: 8,
                height: 6,
                invert: false
            }
        ));
    }

    #[test]
    fn mock_encode_failure() {
        let backend = MockBackend::failing_encode();
        let result = backend.encode(&RasterImage::new(1, 1), EncodedFormat::Png);
        assert!(matches!(result, Err(BackendError::Encode(_))));
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Encode(EncodedFormat::Png)]
        );
    }
}
