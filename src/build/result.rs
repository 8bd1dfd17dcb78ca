//! Build result types.
//!
//! Contains types for representing the outcome of build operations.

use crate::build::{AssetKind, BuildError, Variant};
use std::path::PathBuf;
use std::time::Duration;

/// Byte sizes recorded for a built artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeStats {
    /// Compiled body before minification
    pub compiled_bytes: usize,
    /// Final artifact, header included
    pub artifact_bytes: usize,
}

impl SizeStats {
    /// Percentage saved relative to the compiled body.
    ///
    /// Negative when the artifact grew, which happens on tiny inputs once
    /// the header is added.
    pub fn ratio(&self) -> f64 {
        if self.compiled_bytes == 0 {
            return 0.0;
        }
        (self.compiled_bytes as f64 - self.artifact_bytes as f64) / self.compiled_bytes as f64
            * 100.0
    }
}

/// Result of building one asset kind in one variant.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Asset kind that was built
    pub kind: AssetKind,
    /// Variant that was built
    pub variant: Variant,
    /// Artifact path, set on success
    pub output: Option<PathBuf>,
    /// Error that stopped the build, set on failure
    pub error: Option<BuildError>,
    /// Time from entering the builder to its terminal state
    pub elapsed: Duration,
    /// Artifact sizes, set on success
    pub sizes: Option<SizeStats>,
}

impl BuildOutcome {
    /// Create a successful outcome.
    pub fn success(
        kind: AssetKind,
        variant: Variant,
        output: PathBuf,
        sizes: SizeStats,
        elapsed: Duration,
    ) -> Self {
        Self { kind, variant, output: Some(output), error: None, elapsed, sizes: Some(sizes) }
    }

    /// Create a failed outcome.
    pub fn failed(kind: AssetKind, variant: Variant, error: BuildError, elapsed: Duration) -> Self {
        Self { kind, variant, output: None, error: Some(error), elapsed, sizes: None }
    }

    /// Check if this outcome is successful.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Identifier used in reports, e.g. `script:prod`.
    pub fn id(&self) -> String {
        format!("{}:{}", self.kind, self.variant)
    }

    /// Artifact filename, for successful outcomes.
    pub fn file_name(&self) -> Option<String> {
        self.output
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Outcomes in configuration order
    pub outcomes: Vec<BuildOutcome>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outcome.
    pub fn add_outcome(&mut self, outcome: BuildOutcome) {
        self.outcomes.push(outcome);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Append another report's outcomes and add its duration.
    pub fn merge(&mut self, other: BuildReport) {
        self.outcomes.extend(other.outcomes);
        self.total_duration += other.total_duration;
    }

    /// Get the number of successful outcomes.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Get the number of failed outcomes.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Check if the overall build succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Failed kinds with their errors.
    pub fn failures(&self) -> Vec<(AssetKind, &BuildError)> {
        self.outcomes.iter().filter_map(|o| o.error.as_ref().map(|e| (o.kind, e))).collect()
    }

    /// Filenames written by successful outcomes.
    pub fn output_files(&self) -> Vec<String> {
        self.outcomes.iter().filter_map(|o| o.file_name()).collect()
    }

    /// Format a summary of the build report.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let failed = self.failed_count();
        let total = self.outcomes.len();

        if failed > 0 {
            lines.push(format!(
                "Build failed: {} succeeded, {} failed ({} total)",
                success, failed, total
            ));
            for outcome in self.outcomes.iter().filter(|o| !o.is_success()) {
                if let Some(error) = &outcome.error {
                    lines.push(format!("  - {}: {}", outcome.id(), error));
                }
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} built ({} total) in {:?}",
                success, total, self.total_duration
            ));
        }

        let files = self.output_files();
        if !files.is_empty() {
            lines.push(format!("Artifacts: {}", files.join(", ")));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::CompileError;

    fn ok(kind: AssetKind, path: &str) -> BuildOutcome {
        BuildOutcome::success(
            kind,
            Variant::Production,
            PathBuf::from(path),
            SizeStats { compiled_bytes: 200, artifact_bytes: 150 },
            Duration::from_millis(10),
        )
    }

    fn failed(kind: AssetKind) -> BuildOutcome {
        BuildOutcome::failed(
            kind,
            Variant::Production,
            BuildError::Compile(CompileError { message: "expected \"}\"".to_string() }),
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_size_stats_ratio() {
        let stats = SizeStats { compiled_bytes: 200, artifact_bytes: 150 };
        assert!((stats.ratio() - 25.0).abs() < 1e-9);
        assert_eq!(SizeStats { compiled_bytes: 0, artifact_bytes: 10 }.ratio(), 0.0);
    }

    #[test]
    fn test_outcome_success() {
        let outcome = ok(AssetKind::Style, "dist/css/OpenList-Moe.min.css");
        assert!(outcome.is_success());
        assert_eq!(outcome.id(), "style:prod");
        assert_eq!(outcome.file_name().as_deref(), Some("OpenList-Moe.min.css"));
    }

    #[test]
    fn test_outcome_failed() {
        let outcome = failed(AssetKind::Style);
        assert!(!outcome.is_success());
        assert!(outcome.output.is_none());
        assert!(outcome.file_name().is_none());
    }

    #[test]
    fn test_report_counts() {
        let mut report = BuildReport::new();
        report.add_outcome(ok(AssetKind::Script, "dist/js/OpenList-Moe.min.js"));
        report.add_outcome(failed(AssetKind::Style));

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_success());
        assert_eq!(report.output_files(), vec!["OpenList-Moe.min.js".to_string()]);

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, AssetKind::Style);
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BuildReport::new().is_success());
    }

    #[test]
    fn test_report_merge() {
        let mut first = BuildReport::new().with_duration(Duration::from_millis(10));
        first.add_outcome(ok(AssetKind::Style, "a.css"));
        let mut second = BuildReport::new().with_duration(Duration::from_millis(5));
        second.add_outcome(ok(AssetKind::Style, "a.min.css"));

        first.merge(second);
        assert_eq!(first.outcomes.len(), 2);
        assert_eq!(first.total_duration, Duration::from_millis(15));
    }

    #[test]
    fn test_report_summary_success() {
        let mut report = BuildReport::new();
        report.add_outcome(ok(AssetKind::Style, "dist/css/OpenList-Moe.min.css"));

        let summary = report.with_duration(Duration::from_millis(100)).summary();
        assert!(summary.contains("Build succeeded"));
        assert!(summary.contains("1 built"));
        assert!(summary.contains("OpenList-Moe.min.css"));
    }

    #[test]
    fn test_report_summary_lists_failures() {
        let mut report = BuildReport::new();
        report.add_outcome(failed(AssetKind::Style));
        report.add_outcome(ok(AssetKind::Script, "dist/js/OpenList-Moe.min.js"));

        let summary = report.summary();
        assert!(summary.starts_with("Build failed: 1 succeeded, 1 failed (2 total)"));
        assert!(summary.contains("style:prod: SCSS compilation failed"));
    }
}
