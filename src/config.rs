//! Editor configuration.
//!
//! Settings are read from `decolgen.toml` (in the working directory, or the
//! file passed with `--config`). The file is sparse: stock defaults are the
//! base layer and only the keys present in the file override them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [limits]
//! max_input_bytes = 52428800        # Largest source file read (50 MiB)
//! max_capacity_bytes = 1073741824   # Largest padding target (1 GiB)
//! max_output_pixels = 100000000     # Largest edited image (width × height)
//!
//! [padding]
//! filler = "a"                      # Single ASCII character appended as filler
//!
//! [formats]
//! case_insensitive_extensions = false  # ".JPG" → JPEG when true
//!
//! [output]
//! file_mode = 0o644                 # Permission bits for written files (unix)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::MAX_OUTPUT_PIXELS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "decolgen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `decolgen.toml`.
///
/// Constructed once at startup and passed by reference to every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Memory ceilings.
    pub limits: LimitsConfig,
    /// Capacity padding settings.
    pub padding: PaddingConfig,
    /// Extension matching.
    pub formats: FormatsConfig,
    /// Written file settings.
    pub output: OutputConfig,
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_input_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_input_bytes must be greater than 0".into(),
            ));
        }
        if self.limits.max_capacity_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_capacity_bytes must be greater than 0".into(),
            ));
        }
        if !(1..=MAX_OUTPUT_PIXELS).contains(&self.limits.max_output_pixels) {
            return Err(ConfigError::Validation(format!(
                "limits.max_output_pixels must be between 1 and {MAX_OUTPUT_PIXELS}, got {}",
                self.limits.max_output_pixels
            )));
        }
        let mut chars = self.padding.filler.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "padding.filler must be exactly one ASCII character, got {:?}",
                    self.padding.filler
                )));
            }
        }
        if self.output.file_mode > 0o777 {
            return Err(ConfigError::Validation(format!(
                "output.file_mode must be at most 0o777, got {:#o}",
                self.output.file_mode
            )));
        }
        Ok(())
    }

    /// The filler character as a byte. Valid after [`validate`](Self::validate).
    pub fn filler_byte(&self) -> u8 {
        self.padding
            .filler
            .bytes()
            .next()
            .unwrap_or(crate::padding::DEFAULT_FILLER)
    }
}

/// Memory ceilings enforced before any large allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Source files larger than this are rejected before they are read.
    pub max_input_bytes: u64,
    /// Padding targets larger than this are rejected before allocation.
    pub max_capacity_bytes: u64,
    /// Edits whose output has more pixels than this are rejected before decode.
    /// Can only lower the built-in ceiling.
    pub max_output_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_capacity_bytes: crate::padding::MAX_CAPACITY_BYTES,
            max_output_pixels: MAX_OUTPUT_PIXELS,
        }
    }
}

/// Capacity padding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaddingConfig {
    /// Single ASCII character repeated as filler.
    pub filler: String,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            filler: "a".to_string(),
        }
    }
}

/// Extension matching for output format resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatsConfig {
    /// When false (the default), `.JPG` does not match `.jpg` and encodes as PNG.
    pub case_insensitive_extensions: bool,
}

/// Written file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Unix permission bits for files the editor creates.
    pub file_mode: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { file_mode: 0o644 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(EditorConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<EditorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `decolgen.toml` from a directory, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<EditorConfig, ConfigError> {
    resolve_config(load_raw_config(&dir.join(CONFIG_FILE_NAME))?)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    resolve_config(Some(toml::from_str(&content)?))
}

/// Returns a fully-commented stock `decolgen.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Decolgen Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
# Source files larger than this many bytes are rejected before decoding.
max_input_bytes = 52428800

# Padding targets larger than this many bytes are rejected.
max_capacity_bytes = 1073741824

# Edits whose output (width × height) has more pixels than this are rejected
# before the source is decoded. Values above 100000000 are not allowed.
max_output_pixels = 100000000

# ---------------------------------------------------------------------------
# Capacity padding
# ---------------------------------------------------------------------------
[padding]
# Single ASCII character appended until the file reaches its capacity.
filler = "a"

# ---------------------------------------------------------------------------
# Output format resolution
# ---------------------------------------------------------------------------
[formats]
# The output format follows the source file's extension (.jpg/.jpeg, .png,
# .gif, .bmp, .tiff; anything else is written as PNG). Matching is
# case-sensitive unless this is set to true.
case_insensitive_extensions = false

# ---------------------------------------------------------------------------
# Written files
# ---------------------------------------------------------------------------
[output]
# Permission bits for saved files (unix only).
file_mode = 0o644
"##
}
