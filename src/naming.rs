//! Output filename conventions.
//!
//! Saved files are suggested next to their source as
//! `{stem}_decolgen_{kind}{ext}`:
//! - `holiday.jpg` edited → `holiday_decolgen_edited.jpg`
//! - `scan.pdf` padded → `scan_decolgen_resized.pdf`
//! - `archive.tar.gz` padded → `archive.tar_decolgen_resized.gz`
//!
//! The extension is everything from the last dot of the file name, dot
//! included, and keeps its original case.

use std::path::Path;

/// Which operation produced the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// Pixel adjustments applied.
    Edited,
    /// Padded to a byte capacity.
    Resized,
}

impl SaveKind {
    pub fn suffix(self) -> &'static str {
        match self {
            SaveKind::Edited => "edited",
            SaveKind::Resized => "resized",
        }
    }
}

/// A file name split into stem and extension (`"photo"`, `".png"`).
#[derive(Debug, Clone, PartialEq)]
pub struct SplitName {
    pub stem: String,
    /// Extension with its leading dot, or empty.
    pub extension: String,
}

/// Split the final path component at its last dot.
///
/// - `"dir/photo.png"` → `("photo", ".png")`
/// - `"photo"` → `("photo", "")`
/// - `".hidden"` → `("", ".hidden")`
/// - `"photo."` → `("photo", ".")`
pub fn split_file_name(path: &Path) -> SplitName {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rfind('.') {
        Some(dot) => SplitName {
            stem: name[..dot].to_string(),
            extension: name[dot..].to_string(),
        },
        None => SplitName {
            stem: name,
            extension: String::new(),
        },
    }
}

/// Extension of `path` with its leading dot, or empty.
pub fn extension_of(path: &Path) -> String {
    split_file_name(path).extension
}

/// Suggested output file name for `source`.
pub fn suggested_filename(source: &Path, kind: SaveKind) -> String {
    let SplitName { stem, extension } = split_file_name(source);
    format!("{stem}_decolgen_{}{extension}", kind.suffix())
}
