//! Extension and selector resolution.
//!
//! Both mappings are total: anything unrecognised falls back to a default
//! instead of failing. Unknown output extensions encode as PNG; unknown filter
//! selectors resample with Catmull-Rom.
//!
//! Matching is case-sensitive unless the caller opts in (`.jpg` is JPEG,
//! `.JPG` is PNG by default). See [`resolve_format_with`].

use image::ImageFormat;
use image::imageops::FilterType;

/// Container format the edited image is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodedFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
}

impl EncodedFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            EncodedFormat::Jpeg => ImageFormat::Jpeg,
            EncodedFormat::Png => ImageFormat::Png,
            EncodedFormat::Gif => ImageFormat::Gif,
            EncodedFormat::Bmp => ImageFormat::Bmp,
            EncodedFormat::Tiff => ImageFormat::Tiff,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncodedFormat::Jpeg => "JPEG",
            EncodedFormat::Png => "PNG",
            EncodedFormat::Gif => "GIF",
            EncodedFormat::Bmp => "BMP",
            EncodedFormat::Tiff => "TIFF",
        }
    }

    /// Whether the format drops information on encode.
    pub fn is_lossy(self) -> bool {
        matches!(self, EncodedFormat::Jpeg | EncodedFormat::Gif)
    }
}

impl std::fmt::Display for EncodedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve an extension (with leading dot, as in `".png"`) to an output format.
///
/// Case-sensitive. Equivalent to `resolve_format_with(ext, false)`.
pub fn resolve_format(extension: &str) -> EncodedFormat {
    resolve_format_with(extension, false)
}

/// Resolve an extension, optionally ignoring ASCII case.
pub fn resolve_format_with(extension: &str, case_insensitive: bool) -> EncodedFormat {
    let folded;
    let ext = if case_insensitive {
        folded = extension.to_ascii_lowercase();
        folded.as_str()
    } else {
        extension
    };

    match ext {
        ".jpg" | ".jpeg" => EncodedFormat::Jpeg,
        ".png" => EncodedFormat::Png,
        ".gif" => EncodedFormat::Gif,
        ".bmp" => EncodedFormat::Bmp,
        ".tiff" => EncodedFormat::Tiff,
        _ => EncodedFormat::Png,
    }
}

/// Whether `extension` maps to a format explicitly rather than through the fallback.
pub fn is_known_extension(extension: &str, case_insensitive: bool) -> bool {
    let ext = if case_insensitive {
        extension.to_ascii_lowercase()
    } else {
        extension.to_string()
    };
    matches!(
        ext.as_str(),
        ".jpg" | ".jpeg" | ".png" | ".gif" | ".bmp" | ".tiff"
    )
}

/// Interpolation kernel used by the resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResampleFilter {
    Nearest,
    Linear,
    #[default]
    CatmullRom,
    Lanczos,
}

impl ResampleFilter {
    /// Map a UI selector to a filter. `"none"` and anything unknown become Catmull-Rom.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "nearest" => ResampleFilter::Nearest,
            "linear" => ResampleFilter::Linear,
            "catmullrom" => ResampleFilter::CatmullRom,
            "lanczos" => ResampleFilter::Lanczos,
            _ => ResampleFilter::CatmullRom,
        }
    }

    /// Whether `selector` names a filter explicitly (`"none"` counts as explicit).
    pub fn is_known_selector(selector: &str) -> bool {
        matches!(
            selector,
            "none" | "nearest" | "linear" | "catmullrom" | "lanczos"
        )
    }

    pub fn selector(self) -> &'static str {
        match self {
            ResampleFilter::Nearest => "nearest",
            ResampleFilter::Linear => "linear",
            ResampleFilter::CatmullRom => "catmullrom",
            ResampleFilter::Lanczos => "lanczos",
        }
    }

    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Linear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl From<String> for ResampleFilter {
    fn from(selector: String) -> Self {
        if !Self::is_known_selector(&selector) {
            log::warn!("unknown resample filter {selector:?}, using catmullrom");
        }
        Self::from_selector(&selector)
    }
}
