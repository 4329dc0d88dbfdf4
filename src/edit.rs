//! Editor use cases: open, preview, save, pad.
//!
//! This is the layer a UI (or the CLI) talks to. It owns file I/O, the input
//! size ceiling, and the conversation with the [`SaveTarget`]; pixel work is
//! delegated to an [`ImageBackend`] through
//! [`render_image`](crate::imaging::render_image).
//!
//! ## Flow
//!
//! ```text
//! preview:      read ─▶ render ─▶ bytes (or base64)
//! save_edited:  read ─▶ render ─▶ ask target ─▶ write
//! pad_file:     read ─▶ validate capacity ─▶ ask target ─▶ pad ─▶ write
//! ```
//!
//! Everything that can fail is checked before the target is asked, so a
//! rejected request never leaves a file behind. A target that returns no
//! path yields [`Outcome::Cancelled`], which is not an error.
//!
//! The output format always follows the *source* file's extension.

use crate::config::EditorConfig;
use crate::dialog::{SaveRequest, SaveTarget};
use crate::imaging::{
    BackendError, EncodedFormat, ImageBackend, TransformParameters, get_dimensions,
    is_known_extension, render_image, resolve_format_with,
};
use crate::naming::{SaveKind, extension_of, suggested_filename};
use crate::padding::{Padding, PaddingError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File types offered by the open-file picker.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "ico", "webp"];

#[derive(Error, Debug)]
pub enum EditError {
    #[error("failed to read {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is larger than the {limit} byte input limit", path.display())]
    InputTooLarge { path: PathBuf, limit: u64 },
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("capacity {capacity} bytes must be at least the file size ({actual} bytes)")]
    CapacityTooSmall { capacity: u64, actual: u64 },
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<BackendError> for EditError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Decode(msg) => EditError::Decode(msg),
            BackendError::Encode(msg) => EditError::Encode(msg),
            BackendError::InvalidParameter(msg) => EditError::InvalidParameter(msg),
        }
    }
}

impl From<PaddingError> for EditError {
    fn from(e: PaddingError) -> Self {
        match e {
            PaddingError::CapacityTooSmall { capacity, actual } => {
                EditError::CapacityTooSmall { capacity, actual }
            }
            other @ (PaddingError::InvalidCapacity(_)
            | PaddingError::CapacityExceedsLimit { .. }
            | PaddingError::OutOfMemory { .. }) => {
                EditError::InvalidParameter(other.to_string())
            }
        }
    }
}

/// Result of an operation the user can cancel.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

/// A file the editor wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes_written: u64,
    /// Set for edited images; padding keeps whatever the source was.
    pub format: Option<EncodedFormat>,
}

/// What the open-file picker reports about the chosen file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub name: String,
    /// RFC 3339, local time zone.
    pub mod_time: String,
    pub is_dir: bool,
    /// Permission bits in octal, e.g. `"644"`.
    pub mode: String,
    pub size: u64,
    pub file_path: PathBuf,
}

/// A picked file plus its content in transport (base64) form.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedFile {
    pub info: FileInfo,
    pub base64: String,
}

/// Read a whole source file, refusing anything above `limits.max_input_bytes`.
///
/// The ceiling is enforced while reading, so a file that grows between the
/// size check and the read is still caught.
pub fn read_source(config: &EditorConfig, path: &Path) -> Result<Vec<u8>, EditError> {
    let limit = config.limits.max_input_bytes;
    let read_error = |source| EditError::InputRead {
        path: path.to_path_buf(),
        source,
    };
    let too_large = || EditError::InputTooLarge {
        path: path.to_path_buf(),
        limit,
    };

    let file = fs::File::open(path).map_err(read_error)?;
    let len = file.metadata().map_err(read_error)?.len();
    if len > limit {
        return Err(too_large());
    }

    let mut bytes = Vec::with_capacity(len as usize);
    file.take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(read_error)?;
    if bytes.len() as u64 > limit {
        return Err(too_large());
    }
    Ok(bytes)
}

/// Output format for an edit of `source`.
pub fn output_format(config: &EditorConfig, source: &Path) -> EncodedFormat {
    let extension = extension_of(source);
    let case_insensitive = config.formats.case_insensitive_extensions;
    if !is_known_extension(&extension, case_insensitive) {
        log::warn!(
            "no encoder for extension {extension:?} of {}, writing PNG",
            source.display()
        );
    }
    resolve_format_with(&extension, case_insensitive)
}

/// Read a picked file and describe it.
pub fn open_image(config: &EditorConfig, path: &Path) -> Result<OpenedFile, EditError> {
    let bytes = read_source(config, path)?;
    let metadata = fs::metadata(path).map_err(|source| EditError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mod_time = metadata
        .modified()
        .map(|t| chrono::DateTime::<chrono::Local>::from(t).to_rfc3339())
        .unwrap_or_default();

    let info = FileInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        mod_time,
        is_dir: metadata.is_dir(),
        mode: format!("{:o}", permission_bits(&metadata)),
        size: metadata.len(),
        file_path: path.to_path_buf(),
    };

    Ok(OpenedFile {
        info,
        base64: STANDARD.encode(&bytes),
    })
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

/// Pixel dimensions of a source image, e.g. to default the resize target.
pub fn source_dimensions(
    backend: &impl ImageBackend,
    config: &EditorConfig,
    path: &Path,
) -> Result<(u32, u32), EditError> {
    let bytes = read_source(config, path)?;
    Ok(get_dimensions(backend, &bytes)?)
}

/// Render an edit in memory. Nothing is written.
pub fn preview(
    backend: &impl ImageBackend,
    config: &EditorConfig,
    path: &Path,
    params: &TransformParameters,
) -> Result<Vec<u8>, EditError> {
    let bytes = read_source(config, path)?;
    params.validate_within(config.limits.max_output_pixels)?;
    let format = output_format(config, path);
    let rendered = render_image(backend, &bytes, params, format)?;
    log::info!(
        "preview of {} rendered as {format} ({} bytes)",
        path.display(),
        rendered.len()
    );
    Ok(rendered)
}

/// [`preview`] in its transport form (standard base64).
pub fn preview_base64(
    backend: &impl ImageBackend,
    config: &EditorConfig,
    path: &Path,
    params: &TransformParameters,
) -> Result<String, EditError> {
    Ok(STANDARD.encode(preview(backend, config, path, params)?))
}

/// Render an edit and write it where the target says.
pub fn save_edited(
    backend: &impl ImageBackend,
    config: &EditorConfig,
    path: &Path,
    params: &TransformParameters,
    target: &mut impl SaveTarget,
) -> Result<Outcome<SavedFile>, EditError> {
    let bytes = read_source(config, path)?;
    params.validate_within(config.limits.max_output_pixels)?;
    let format = output_format(config, path);
    let rendered = render_image(backend, &bytes, params, format)?;

    let request = save_request("Save Edited Image", path, SaveKind::Edited);
    let Some(destination) = target.choose(&request) else {
        log::info!("save of edited {} cancelled", path.display());
        return Ok(Outcome::Cancelled);
    };

    write_output(config, &destination, &rendered)?;
    Ok(Outcome::Done(SavedFile {
        path: destination,
        bytes_written: rendered.len() as u64,
        format: Some(format),
    }))
}

/// Pad a file to exactly `capacity` bytes and write it where the target says.
pub fn pad_file(
    config: &EditorConfig,
    path: &Path,
    capacity: i64,
    target: &mut impl SaveTarget,
) -> Result<Outcome<SavedFile>, EditError> {
    let bytes = read_source(config, path)?;
    let padding =
        Padding::new(capacity, config.filler_byte())?.within(config.limits.max_capacity_bytes)?;
    padding.fill_len(bytes.len())?;

    let request = save_request("Save Resized Image", path, SaveKind::Resized);
    let Some(destination) = target.choose(&request) else {
        log::info!("save of padded {} cancelled", path.display());
        return Ok(Outcome::Cancelled);
    };

    let padded = padding.apply(bytes)?;
    write_output(config, &destination, &padded)?;
    Ok(Outcome::Done(SavedFile {
        path: destination,
        bytes_written: padded.len() as u64,
        format: None,
    }))
}

fn save_request(title: &'static str, source: &Path, kind: SaveKind) -> SaveRequest {
    let default_dir = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    SaveRequest {
        title,
        suggested_name: suggested_filename(source, kind),
        default_dir,
    }
}

/// Write a whole file in one call, creating it with `output.file_mode`.
pub fn write_output(config: &EditorConfig, path: &Path, bytes: &[u8]) -> Result<(), EditError> {
    let write_error = |source| EditError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(config.output.file_mode);
    }
    #[cfg(not(unix))]
    let _ = config;

    let mut file = options.open(path).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
