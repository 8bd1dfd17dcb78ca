//! Configuration schema types for `moe.toml`
//!
//! Defines the structure and validation rules for the asset build configuration.

use super::loader::resolve_path;
use crate::build::{AssetKind, AssetTarget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default release variable holding the package version.
pub const DEFAULT_VERSION_ENV: &str = "MOE_VERSION";

/// Default release variable holding the upstream compatibility version.
pub const DEFAULT_UPSTREAM_ENV: &str = "OP_VERSION";

/// Build settings shared by every asset kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of leading lines treated as the license header
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { header_lines: default_header_lines() }
    }
}

fn default_header_lines() -> usize {
    15
}

/// Names of the environment variables read in release mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Variable carrying the package version
    #[serde(default = "default_version_env")]
    pub version_env: String,
    /// Variable carrying the upstream compatibility version
    #[serde(default = "default_upstream_env")]
    pub upstream_env: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self { version_env: default_version_env(), upstream_env: default_upstream_env() }
    }
}

fn default_version_env() -> String {
    DEFAULT_VERSION_ENV.to_string()
}

fn default_upstream_env() -> String {
    DEFAULT_UPSTREAM_ENV.to_string()
}

/// Input and output locations for one asset kind
#[derive(Debug, Clone, Serialize)]
pub struct AssetConfig {
    /// Build this asset at all
    pub enabled: bool,
    /// Source file, relative to the project root
    pub input: PathBuf,
    /// Output directory, relative to the project root
    pub out_dir: PathBuf,
    /// Development artifact filename
    pub dev_file: String,
    /// Production artifact filename
    pub prod_file: String,
}

impl AssetConfig {
    /// Default layout for the stylesheet.
    pub fn default_style() -> Self {
        Self {
            enabled: true,
            input: PathBuf::from("src/styles/main.scss"),
            out_dir: PathBuf::from("dist/css"),
            dev_file: "OpenList-Moe.css".to_string(),
            prod_file: "OpenList-Moe.min.css".to_string(),
        }
    }

    /// Default layout for the script.
    pub fn default_script() -> Self {
        Self {
            enabled: true,
            input: PathBuf::from("src/script/main.js"),
            out_dir: PathBuf::from("dist/js"),
            dev_file: "OpenList-Moe.js".to_string(),
            prod_file: "OpenList-Moe.min.js".to_string(),
        }
    }
}

/// One `[assets.*]` table as written; unset keys fall back to the kind's layout.
#[derive(Debug, Default, Deserialize)]
struct AssetSection {
    enabled: Option<bool>,
    input: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    dev_file: Option<String>,
    prod_file: Option<String>,
}

impl AssetSection {
    fn over(self, base: AssetConfig) -> AssetConfig {
        AssetConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            input: self.input.unwrap_or(base.input),
            out_dir: self.out_dir.unwrap_or(base.out_dir),
            dev_file: self.dev_file.unwrap_or(base.dev_file),
            prod_file: self.prod_file.unwrap_or(base.prod_file),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AssetSections {
    #[serde(default)]
    style: AssetSection,
    #[serde(default)]
    script: AssetSection,
}

/// Asset sections, one per kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AssetSections")]
pub struct AssetsConfig {
    /// Stylesheet (SCSS) asset
    pub style: AssetConfig,
    /// Script (JavaScript) asset
    pub script: AssetConfig,
}

impl From<AssetSections> for AssetsConfig {
    fn from(sections: AssetSections) -> Self {
        Self {
            style: sections.style.over(AssetConfig::default_style()),
            script: sections.script.over(AssetConfig::default_script()),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetSections::default().into()
    }
}

/// Complete `moe.toml` configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoeConfig {
    /// Shared build settings
    #[serde(default)]
    pub build: BuildConfig,
    /// Release variable names
    #[serde(default)]
    pub release: ReleaseConfig,
    /// Per-kind asset layout
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Config validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl MoeConfig {
    /// Validate the configuration.
    ///
    /// Returns every problem found rather than stopping at the first one.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.build.header_lines == 0 {
            errors.push(ValidationError {
                field: "build.header_lines".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        for (field, value) in [
            ("release.version_env", &self.release.version_env),
            ("release.upstream_env", &self.release.upstream_env),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: "variable name cannot be empty".to_string(),
                });
            }
        }

        for (name, asset) in [("style", &self.assets.style), ("script", &self.assets.script)] {
            if asset.dev_file.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("assets.{}.dev_file", name),
                    message: "filename cannot be empty".to_string(),
                });
            }
            if asset.prod_file.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("assets.{}.prod_file", name),
                    message: "filename cannot be empty".to_string(),
                });
            }
            if asset.dev_file == asset.prod_file {
                errors.push(ValidationError {
                    field: format!("assets.{}", name),
                    message: "dev_file and prod_file must differ".to_string(),
                });
            }
        }

        errors
    }

    /// Resolve the enabled asset sections into build targets.
    ///
    /// Relative paths are joined onto `root`. Targets come back in
    /// configuration order: style first, then script.
    pub fn targets(&self, root: &Path) -> Vec<AssetTarget> {
        [(AssetKind::Style, &self.assets.style), (AssetKind::Script, &self.assets.script)]
            .into_iter()
            .filter(|(_, asset)| asset.enabled)
            .map(|(kind, asset)| AssetTarget {
                kind,
                input: resolve_path(root, &asset.input),
                out_dir: resolve_path(root, &asset.out_dir),
                dev_file: asset.dev_file.clone(),
                prod_file: asset.prod_file.clone(),
            })
            .collect()
    }
}
