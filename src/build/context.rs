//! Build context: the metadata substituted into every artifact.
//!
//! A context is resolved once per invocation and shared read-only by every
//! target, so all artifacts of one run carry the same timestamp.

use crate::build::Variant;
use crate::config::{ConfigError, ReleaseConfig};
use chrono::{DateTime, Local};

/// Version identifier used outside of release builds.
pub const UNRELEASED: &str = "unreleased";

/// `chrono` format for build timestamps: `YYYYMMDDhhmm`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Build mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum BuildMode {
    /// Release build: versions come from the environment, both variants are built
    Ci,
    /// Local production build
    Prod,
    /// Local development build
    Dev,
}

impl BuildMode {
    /// Whether the mode reads release identifiers from the environment.
    pub fn is_release(&self) -> bool {
        matches!(self, BuildMode::Ci)
    }

    /// Variants built by this mode, in build order.
    pub fn variants(&self) -> &'static [Variant] {
        match self {
            BuildMode::Ci => &[Variant::Development, Variant::Production],
            BuildMode::Prod => &[Variant::Production],
            BuildMode::Dev => &[Variant::Development],
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMode::Ci => write!(f, "ci"),
            BuildMode::Prod => write!(f, "prod"),
            BuildMode::Dev => write!(f, "dev"),
        }
    }
}

/// Resolved build metadata.
///
/// Fields are private; a context cannot change after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    package_version: String,
    version_log_label: String,
    upstream_compat_version: String,
    timestamp: String,
}

impl BuildContext {
    /// Create a context from explicit values.
    pub fn new(
        package_version: impl Into<String>,
        version_log_label: impl Into<String>,
        upstream_compat_version: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            package_version: package_version.into(),
            version_log_label: version_log_label.into(),
            upstream_compat_version: upstream_compat_version.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Resolve the context for a mode from the process environment and the
    /// current local time.
    pub fn resolve(mode: BuildMode, release: &ReleaseConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(mode, release, |name| std::env::var(name).ok(), Local::now())
    }

    /// Resolve the context with an explicit variable lookup and clock reading.
    ///
    /// Local modes use the [`UNRELEASED`] placeholder for both versions and
    /// label the build with its timestamp. Release mode requires both
    /// variables named in `release` to be present and non-empty, and labels
    /// the build with the package version.
    pub fn resolve_with<F>(
        mode: BuildMode,
        release: &ReleaseConfig,
        lookup: F,
        now: DateTime<Local>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timestamp = format_timestamp(&now);

        if !mode.is_release() {
            return Ok(Self::new(UNRELEASED, timestamp.clone(), UNRELEASED, timestamp));
        }

        let required = |name: &str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingVariable { name: name.to_string() })
        };

        let package_version = required(&release.version_env)?;
        let upstream_compat_version = required(&release.upstream_env)?;

        Ok(Self::new(package_version.clone(), package_version, upstream_compat_version, timestamp))
    }

    /// Package version identifier.
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Label printed in the script's console banner.
    pub fn version_log_label(&self) -> &str {
        &self.version_log_label
    }

    /// Upstream compatibility version.
    pub fn upstream_compat_version(&self) -> &str {
        &self.upstream_compat_version
    }

    /// Build timestamp, `YYYYMMDDhhmm`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Format a clock reading as a build timestamp.
pub fn format_timestamp(now: &DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}
