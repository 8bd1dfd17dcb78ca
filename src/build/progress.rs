//! Build progress reporting.
//!
//! The orchestrator reports through a [`ProgressReporter`] so the build
//! itself never writes to the terminal. The binary uses [`ConsoleProgress`];
//! tests use [`NullProgress`] or their own recorder.
//!
//! # Example
//!
//! ```ignore
//! use moekit::build::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
//! use moekit::build::Variant;
//!
//! let reporter = ConsoleProgress::new();
//! reporter.report(ProgressEvent::BuildStarted { variant: Variant::Production, total_targets: 2 });
//! ```

use crate::build::{AssetKind, BuildOutcome, SizeStats, Variant};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Status of a target in progress events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// Target built successfully
    Success,
    /// Target build failed
    Failed(String),
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetStatus::Success => write!(f, "success"),
            TargetStatus::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Events that can be reported during a build.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A variant build started
    BuildStarted {
        /// Variant being built
        variant: Variant,
        /// Number of asset targets launched
        total_targets: usize,
    },
    /// A target reached its terminal state
    TargetCompleted {
        /// Target identifier, e.g. `style:prod`
        target_id: String,
        /// Asset kind
        kind: AssetKind,
        /// Build status
        status: TargetStatus,
        /// Duration in milliseconds
        duration_ms: u64,
        /// Artifact filename on success
        output: Option<String>,
        /// Artifact sizes on success
        sizes: Option<SizeStats>,
    },
    /// A variant build completed
    BuildCompleted {
        /// Whether every target succeeded
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Number of successful targets
        succeeded: usize,
        /// Number of failed targets
        failed: usize,
    },
    /// An error outside of any single target
    Error {
        /// Target that generated the error (if applicable)
        target_id: Option<String>,
        /// Error message
        message: String,
    },
}

impl ProgressEvent {
    /// Build a `TargetCompleted` event from an outcome.
    pub fn target_completed(outcome: &BuildOutcome) -> Self {
        let status = match &outcome.error {
            None => TargetStatus::Success,
            Some(e) => TargetStatus::Failed(e.to_string()),
        };
        ProgressEvent::TargetCompleted {
            target_id: outcome.id(),
            kind: outcome.kind,
            status,
            duration_ms: outcome.elapsed.as_millis() as u64,
            output: outcome.file_name(),
            sizes: outcome.sizes,
        }
    }
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Current target count
    current: AtomicUsize,
    /// Total target count
    total: AtomicUsize,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a new console progress reporter writing to stderr.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false, // Disable colors for custom output
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, "\x1b[1m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BuildStarted { variant, total_targets } => {
                self.total.store(total_targets, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                if total_targets > 0 {
                    self.writeln(&format!(
                        "{} Building {} {} target{}...",
                        self.cyan("[build]"),
                        total_targets,
                        variant,
                        if total_targets == 1 { "" } else { "s" }
                    ));
                }
            }
            ProgressEvent::TargetCompleted {
                target_id,
                kind,
                status,
                duration_ms,
                output,
                sizes,
            } => {
                let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                let total = self.total.load(Ordering::SeqCst);

                let status_str = match &status {
                    TargetStatus::Success => self.green("ok"),
                    TargetStatus::Failed(_) => self.red("FAILED"),
                };

                let detail = match (&output, &sizes) {
                    (Some(file), Some(sizes)) => format!(
                        " -> {} [{} -> {}, {:.1}%]",
                        file,
                        format_size(sizes.compiled_bytes),
                        format_size(sizes.artifact_bytes),
                        sizes.ratio()
                    ),
                    (Some(file), None) => format!(" -> {}", file),
                    _ => String::new(),
                };

                self.writeln(&format!(
                    "{} [{}/{}] {} {} {}{} ({})",
                    self.cyan("[build]"),
                    current,
                    total,
                    status_str,
                    kind.glyph(),
                    target_id,
                    detail,
                    format_duration(duration_ms)
                ));

                if let TargetStatus::Failed(err) = status {
                    self.writeln(&format!("        {}", self.red(&err)));
                }
            }
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, failed } => {
                let duration_str = format_duration(duration_ms);

                if success {
                    self.writeln(&format!(
                        "{} {} {} built in {}",
                        self.green("[done]"),
                        self.bold(&succeeded.to_string()),
                        if succeeded == 1 { "target" } else { "targets" },
                        duration_str
                    ));
                } else {
                    self.writeln(&format!(
                        "{} Build failed: {} succeeded, {} {} in {}",
                        self.red("[error]"),
                        succeeded,
                        failed,
                        if failed == 1 { "failure" } else { "failures" },
                        duration_str
                    ));
                }
            }
            ProgressEvent::Error { target_id, message } => {
                let prefix = match target_id {
                    Some(id) => format!("{}: ", id),
                    None => String::new(),
                };
                self.writeln(&format!("{} {}{}", self.red("[error]"), prefix, message));
            }
        }
    }
}

/// Format a duration in milliseconds to a human-readable string.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}

/// Format a byte count in kilobytes with one decimal.
fn format_size(bytes: usize) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}
