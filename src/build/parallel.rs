//! Parallel build execution.
//!
//! Every configured asset target is built on its own scoped thread. All
//! threads are joined before the report is returned, so a failing target
//! never stops its siblings.
//!
//! # Example
//!
//! ```ignore
//! use moekit::build::{BuildContext, GrassCompiler, NativeMinifier, Orchestrator, Variant};
//!
//! let report = Orchestrator::new(targets, 15, Box::new(GrassCompiler), Box::new(NativeMinifier))
//!     .build_all(&context, Variant::Production);
//!
//! println!("{}", report.summary());
//! ```

use crate::build::progress::{NullProgress, ProgressEvent, ProgressReporter};
use crate::build::{
    AssetTarget, BuildContext, BuildError, BuildOutcome, BuildReport, Minifier, StyleCompiler,
    TargetBuilder, Variant,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::debug;

/// Runs the single-target builder for every configured asset concurrently.
pub struct Orchestrator {
    /// Targets in configuration order
    targets: Vec<AssetTarget>,
    /// Header size shared by every kind
    header_lines: usize,
    /// Style compiler shared by every thread
    compiler: Box<dyn StyleCompiler>,
    /// Minifier shared by every thread
    minifier: Box<dyn Minifier>,
    /// Receives one event per finished target
    reporter: Box<dyn ProgressReporter>,
}

impl Orchestrator {
    /// Create an orchestrator that reports nowhere.
    pub fn new(
        targets: Vec<AssetTarget>,
        header_lines: usize,
        compiler: Box<dyn StyleCompiler>,
        minifier: Box<dyn Minifier>,
    ) -> Self {
        Self { targets, header_lines, compiler, minifier, reporter: Box::new(NullProgress) }
    }

    /// Set the progress reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Build every target in one variant.
    ///
    /// Outcomes are stored in configuration order; completion order between
    /// targets is not defined.
    pub fn build_all(&self, context: &BuildContext, variant: Variant) -> BuildReport {
        let start = Instant::now();
        self.reporter.report(ProgressEvent::BuildStarted {
            variant,
            total_targets: self.targets.len(),
        });
        debug!(%variant, targets = self.targets.len(), "starting parallel build");

        let builder = TargetBuilder::new(self.header_lines, self.compiler.as_ref(), self.minifier.as_ref());
        let mut report = BuildReport::new();

        std::thread::scope(|s| {
            let handles: Vec<_> = self
                .targets
                .iter()
                .map(|target| {
                    let handle = s.spawn(move || {
                        let started = Instant::now();
                        panic::catch_unwind(AssertUnwindSafe(|| builder.build(target, context, variant)))
                            .unwrap_or_else(|payload| panicked(target, variant, payload, started.elapsed()))
                    });
                    (target, handle)
                })
                .collect();

            for (target, handle) in handles {
                let outcome = handle
                    .join()
                    .unwrap_or_else(|payload| panicked(target, variant, payload, Duration::ZERO));
                self.reporter.report(ProgressEvent::target_completed(&outcome));
                report.add_outcome(outcome);
            }
        });

        let report = report.with_duration(start.elapsed());
        self.reporter.report(ProgressEvent::BuildCompleted {
            success: report.is_success(),
            duration_ms: report.total_duration.as_millis() as u64,
            succeeded: report.success_count(),
            failed: report.failed_count(),
        });
        report
    }
}

fn panicked(
    target: &AssetTarget,
    variant: Variant,
    payload: Box<dyn Any + Send>,
    elapsed: Duration,
) -> BuildOutcome {
    BuildOutcome::failed(
        target.kind,
        variant,
        BuildError::Panicked(panic_message(payload.as_ref())),
        elapsed,
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{AssetKind, CompileError, MinifyError};
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct PassthroughCompiler;

    impl StyleCompiler for PassthroughCompiler {
        fn compile_style(&self, source: &str, _load_dir: &Path) -> Result<String, CompileError> {
            Ok(source.to_string())
        }
    }

    struct PanickingCompiler;

    impl StyleCompiler for PanickingCompiler {
        fn compile_style(&self, _source: &str, _load_dir: &Path) -> Result<String, CompileError> {
            std::thread::sleep(Duration::from_millis(20));
            panic!("compiler crashed");
        }
    }

    struct TrimMinifier;

    impl Minifier for TrimMinifier {
        fn minify(&self, text: &str, _kind: AssetKind) -> Result<String, MinifyError> {
            Ok(text.trim().to_string())
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl ProgressReporter for Recorder {
        fn report(&self, event: ProgressEvent) {
            let line = match event {
                ProgressEvent::BuildStarted { total_targets, .. } => format!("start {}", total_targets),
                ProgressEvent::TargetCompleted { target_id, .. } => format!("done {}", target_id),
                ProgressEvent::BuildCompleted { success, .. } => format!("end {}", success),
                ProgressEvent::Error { message, .. } => format!("error {}", message),
            };
            self.0.lock().unwrap().push(line);
        }
    }

    fn targets(root: &Path) -> Vec<AssetTarget> {
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.scss"), "/* css */\n.a { b: c; }").unwrap();
        fs::write(root.join("src/main.js"), "// js\nrun();").unwrap();
        vec![
            AssetTarget {
                kind: AssetKind::Style,
                input: root.join("src/main.scss"),
                out_dir: root.join("dist/css"),
                dev_file: "a.css".to_string(),
                prod_file: "a.min.css".to_string(),
            },
            AssetTarget {
                kind: AssetKind::Script,
                input: root.join("src/main.js"),
                out_dir: root.join("dist/js"),
                dev_file: "a.js".to_string(),
                prod_file: "a.min.js".to_string(),
            },
        ]
    }

    fn ctx() -> BuildContext {
        BuildContext::new("1.2.3", "1.2.3", "4.0.0", "202501011200")
    }

    #[test]
    fn test_build_all_keeps_configuration_order() {
        let temp = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(
            targets(temp.path()),
            1,
            Box::new(PassthroughCompiler),
            Box::new(TrimMinifier),
        );

        let report = orchestrator.build_all(&ctx(), Variant::Production);

        assert!(report.is_success());
        let kinds: Vec<_> = report.outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![AssetKind::Style, AssetKind::Script]);
        assert!(temp.path().join("dist/css/a.min.css").exists());
        assert!(temp.path().join("dist/js/a.min.js").exists());
        assert!(!temp.path().join("dist/js/a.js").exists());
    }

    #[test]
    fn test_build_all_reports_each_outcome() {
        let temp = TempDir::new().unwrap();
        let recorder = Recorder::default();
        let orchestrator = Orchestrator::new(
            targets(temp.path()),
            1,
            Box::new(PassthroughCompiler),
            Box::new(TrimMinifier),
        )
        .with_reporter(Box::new(recorder.clone()));

        orchestrator.build_all(&ctx(), Variant::Development);

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(events, vec!["start 2", "done style:dev", "done script:dev", "end true"]);
    }

    #[test]
    fn test_panicking_target_does_not_stop_sibling() {
        let temp = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(
            targets(temp.path()),
            1,
            Box::new(PanickingCompiler),
            Box::new(TrimMinifier),
        );

        let report = orchestrator.build_all(&ctx(), Variant::Development);

        assert!(!report.is_success());
        assert_eq!(report.failed_count(), 1);
        match &report.outcomes[0].error {
            Some(BuildError::Panicked(msg)) => assert_eq!(msg, "compiler crashed"),
            other => panic!("expected panic error, got {:?}", other),
        }
        assert!(report.outcomes[0].elapsed >= Duration::from_millis(20));
        assert!(report.outcomes[1].is_success());
        assert!(temp.path().join("dist/js/a.js").exists());
    }

    #[test]
    fn test_build_all_with_no_targets() {
        let orchestrator =
            Orchestrator::new(vec![], 15, Box::new(PassthroughCompiler), Box::new(TrimMinifier));
        let report = orchestrator.build_all(&ctx(), Variant::Production);
        assert!(report.is_success());
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
