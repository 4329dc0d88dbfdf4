//! Application metadata.
//!
//! [`AppInfo`] is built once at startup and handed to whatever needs it
//! (the `about` command, `--version`). It comes either from the build itself
//! or from a desktop manifest document of the form:
//!
//! ```json
//! { "info": { "productName": "Decolgen", "productVersion": "1.2.0",
//!             "copyright": "Example Ltd", "comments": "Image toolkit" } }
//! ```

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppInfoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable name/version/copyright block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub copyright: String,
    pub comments: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Manifest {
    info: ManifestInfo,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ManifestInfo {
    product_name: String,
    product_version: String,
    copyright: String,
    comments: String,
}

impl AppInfo {
    /// Metadata of this build. Off a release tag the version is `dev@<hash>`.
    pub fn from_build() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: build_version(env!("ON_RELEASE_TAG"), env!("GIT_HASH")),
            copyright: String::new(),
            comments: env!("CARGO_PKG_DESCRIPTION").to_string(),
        }
    }

    /// Parse a desktop manifest. Missing keys become empty strings.
    pub fn from_manifest_json(json: &str) -> Result<Self, AppInfoError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let info = manifest.info;
        Ok(Self {
            name: info.product_name,
            version: info.product_version,
            copyright: info.copyright,
            comments: info.comments,
        })
    }

    pub fn from_manifest_file(path: &std::path::Path) -> Result<Self, AppInfoError> {
        Self::from_manifest_json(&std::fs::read_to_string(path)?)
    }

    /// Text for an "About" box.
    pub fn about_text(&self, year: i32) -> String {
        format!(
            "Version: {}\n{} \n\n © {} {}",
            self.version, self.comments, self.copyright, year
        )
    }
}

fn build_version(on_release_tag: &str, git_hash: &str) -> String {
    if on_release_tag == "true" {
        env!("CARGO_PKG_VERSION").to_string()
    } else if git_hash.is_empty() {
        "dev@unknown".to_string()
    } else {
        format!("dev@{git_hash}")
    }
}
