//! # Decolgen
//!
//! An image adjustment and capacity padding utility. Open an image, preview a
//! chain of adjustments, save the result in the source's format, or pad any
//! file with filler bytes up to an exact size.
//!
//! # Architecture: Operations Over a Backend
//!
//! Every user action is a function in [`edit`] that takes its collaborators as
//! arguments: an [`imaging::ImageBackend`] for pixels, an
//! [`config::EditorConfig`] for limits, and a [`dialog::SaveTarget`] for the
//! destination. The flow of a save is always:
//!
//! ```text
//! read source  →  validate  →  render / pad  →  ask target  →  write
//!                                                  │
//!                                                  └─ no path: Cancelled
//! ```
//!
//! Every failure is detected before the target is asked, and nothing touches
//! the filesystem until a destination has been chosen. A declined dialog is an
//! [`edit::Outcome::Cancelled`] value, not an error.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Format resolution, transformation parameters, the backend trait and its pure-Rust implementation |
//! | [`padding`] | Exact-size filler padding |
//! | [`naming`] | Suggested output names (`{stem}_decolgen_{kind}{ext}`) |
//! | [`dialog`] | Save-destination abstraction: fixed path, suggested path, interactive prompt |
//! | [`edit`] | The user-facing operations and their error taxonomy |
//! | [`config`] | `decolgen.toml` loading, merging over stock defaults, validation |
//! | [`app`] | Application name, version, and about text |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed Pipeline Order
//!
//! Adjustments always run resize, blur, sharpen, gamma, contrast, brightness,
//! saturation, invert. The caller supplies values, never an order, so the same
//! request renders the same pixels everywhere. Steps at their neutral value
//! are skipped entirely, which makes a neutral request pixel-exact.
//!
//! ## Format Follows the Source
//!
//! The output encoding is picked from the source file's extension and nothing
//! else. Unknown extensions fall back to PNG, which is lossless and keeps
//! alpha. Matching is case-sensitive unless `formats.case_insensitive_extensions`
//! is set.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, and encoding all go through the `image` crate. There
//! are no system libraries to install and the binary is self-contained.

pub mod app;
pub mod config;
pub mod dialog;
pub mod edit;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod padding;

#[cfg(test)]
pub(crate) mod test_helpers;
