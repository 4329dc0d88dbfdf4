//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Open
//!
//! ```text
//! dawn.png
//!     Path: /photos/dawn.png
//!     Size: 48213 bytes
//!     Modified: 2026-03-01T09:12:44+01:00
//!     Mode: 644
//! ```
//!
//! ## Edit / Pad
//!
//! ```text
//! Saved dawn_decolgen_edited.png (PNG, 51877 bytes)
//!     Path: /photos/dawn_decolgen_edited.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::app::AppInfo;
use crate::edit::{FileInfo, Outcome, SavedFile};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name_of(saved: &SavedFile) -> String {
    saved
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| saved.path.display().to_string())
}

pub fn format_file_info(info: &FileInfo) -> Vec<String> {
    let kind = if info.is_dir { " (directory)" } else { "" };
    vec![
        format!("{}{}", info.name, kind),
        format!("{}Path: {}", indent(1), info.file_path.display()),
        format!("{}Size: {} bytes", indent(1), info.size),
        format!("{}Modified: {}", indent(1), info.mod_time),
        format!("{}Mode: {}", indent(1), info.mode),
    ]
}

pub fn format_saved(outcome: &Outcome<SavedFile>) -> Vec<String> {
    match outcome {
        Outcome::Cancelled => vec!["Cancelled, nothing written".to_string()],
        Outcome::Done(saved) => {
            let detail = match saved.format {
                Some(format) => format!("{format}, {} bytes", saved.bytes_written),
                None => format!("{} bytes", saved.bytes_written),
            };
            vec![
                format!("Saved {} ({detail})", file_name_of(saved)),
                format!("{}Path: {}", indent(1), saved.path.display()),
            ]
        }
    }
}

pub fn format_about(info: &AppInfo, year: i32) -> Vec<String> {
    let mut lines = vec![info.name.clone()];
    lines.extend(info.about_text(year).lines().map(str::to_string));
    lines
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_file_info(info: &FileInfo) {
    print_lines(format_file_info(info));
}

pub fn print_saved(outcome: &Outcome<SavedFile>) {
    print_lines(format_saved(outcome));
}

pub fn print_about(info: &AppInfo, year: i32) {
    print_lines(format_about(info, year));
}
