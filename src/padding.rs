//! Capacity padding: grow a file's bytes to an exact size.
//!
//! The original bytes are kept verbatim as a prefix and filler bytes are
//! appended until the buffer is exactly the requested capacity. Nothing inside
//! the original content is touched. No length field or checksum is rewritten,
//! so the result only stays readable for containers whose decoders ignore
//! trailing data after their end marker (JPEG, PNG, GIF, BMP and TIFF do).
//!
//! Padding never truncates: a capacity below the current size is an error.
//! [`pad`] refuses targets above [`MAX_CAPACITY_BYTES`]; callers with their
//! own ceiling use [`Padding::within`]. Allocation failure is reported as
//! [`PaddingError::OutOfMemory`] rather than aborting.

use thiserror::Error;

/// Filler appended by default (`'a'`).
pub const DEFAULT_FILLER: u8 = b'a';

/// Ceiling applied by [`pad`]: 1 GiB.
pub const MAX_CAPACITY_BYTES: u64 = 1024 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaddingError {
    #[error("capacity must be greater than 0, got {0}")]
    InvalidCapacity(i64),
    #[error("capacity {capacity} bytes is smaller than the file ({actual} bytes)")]
    CapacityTooSmall { capacity: u64, actual: u64 },
    #[error("capacity {capacity} bytes exceeds the limit of {limit} bytes")]
    CapacityExceedsLimit { capacity: u64, limit: u64 },
    #[error("could not allocate {capacity} bytes for padding")]
    OutOfMemory { capacity: u64 },
}

/// A validated padding request: target size plus filler byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub capacity: u64,
    pub filler: u8,
}

impl Padding {
    /// Validate a raw capacity as it arrives from a form or command line.
    pub fn new(capacity: i64, filler: u8) -> Result<Self, PaddingError> {
        if capacity <= 0 {
            return Err(PaddingError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity: capacity as u64,
            filler,
        })
    }

    /// Reject targets above `limit` before anything is allocated.
    pub fn within(self, limit: u64) -> Result<Self, PaddingError> {
        if self.capacity > limit {
            return Err(PaddingError::CapacityExceedsLimit {
                capacity: self.capacity,
                limit,
            });
        }
        Ok(self)
    }

    /// Number of filler bytes needed for a source of `len` bytes.
    pub fn fill_len(&self, len: usize) -> Result<usize, PaddingError> {
        let actual = len as u64;
        if self.capacity < actual {
            return Err(PaddingError::CapacityTooSmall {
                capacity: self.capacity,
                actual,
            });
        }
        Ok((self.capacity - actual) as usize)
    }

    /// Append filler to `bytes` in place.
    pub fn apply(&self, mut bytes: Vec<u8>) -> Result<Vec<u8>, PaddingError> {
        let fill = self.fill_len(bytes.len())?;
        bytes
            .try_reserve_exact(fill)
            .map_err(|_| PaddingError::OutOfMemory {
                capacity: self.capacity,
            })?;
        bytes.resize(bytes.len() + fill, self.filler);
        Ok(bytes)
    }
}

/// Return `bytes` followed by filler up to exactly `capacity` bytes.
pub fn pad(bytes: &[u8], capacity: i64, filler: u8) -> Result<Vec<u8>, PaddingError> {
    let padding = Padding::new(capacity, filler)?.within(MAX_CAPACITY_BYTES)?;
    padding.fill_len(bytes.len())?;
    padding.apply(bytes.to_vec())
}
