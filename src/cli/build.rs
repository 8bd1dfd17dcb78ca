//! Build command implementation

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::debug;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::build::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
use crate::build::{
    BuildContext, BuildMode, BuildReport, GrassCompiler, NativeMinifier, Orchestrator,
};
use crate::config::loader::{default_config, find_config, load_config, project_root};
use crate::config::{ConfigError, MoeConfig};

/// Run the build command
pub fn run_build(mode: BuildMode, config_path: Option<&Path>, verbose: bool) -> ExitCode {
    let reporter = ConsoleProgress::new().with_colors(std::io::stderr().is_terminal());

    let (config, root) = match load_project(config_path, verbose) {
        Ok(loaded) => loaded,
        Err(e) => {
            report_fatal(&reporter, &e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let context = match BuildContext::resolve(mode, &config.release) {
        Ok(context) => context,
        Err(e) => {
            report_fatal(&reporter, &e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    debug!(%mode, version = context.package_version(), timestamp = context.timestamp(), "resolved build context");

    let report = build_project(mode, &config, &root, &context, Box::new(reporter));
    if report.is_success() {
        println!("{}", report.summary());
    } else {
        eprintln!("{}", report.summary());
    }

    ExitCode::from(exit_status(&report))
}

/// Load the project configuration and its root directory.
///
/// An explicit path is loaded as-is. Otherwise `moe.toml` is searched for
/// upwards from the working directory; without one the defaults apply and
/// the working directory is the root.
pub fn load_project(
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<(MoeConfig, PathBuf), ConfigError> {
    let cwd = std::env::current_dir()?;
    let found = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };

    match found {
        Some(path) => {
            if verbose {
                println!("Using config: {}", path.display());
            }
            let config = load_config(Some(&path))?;
            let root = project_root(&path)
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or(cwd);
            Ok((config, root))
        }
        None => {
            if verbose {
                println!("No moe.toml found, using defaults");
            }
            Ok((default_config(), cwd))
        }
    }
}

/// Build every variant the mode asks for and merge the reports.
///
/// Variants run one after another; targets within a variant run in parallel.
pub fn build_project(
    mode: BuildMode,
    config: &MoeConfig,
    root: &Path,
    context: &BuildContext,
    reporter: Box<dyn ProgressReporter>,
) -> BuildReport {
    let orchestrator = Orchestrator::new(
        config.targets(root),
        config.build.header_lines,
        Box::new(GrassCompiler::new()),
        Box::new(NativeMinifier::new()),
    )
    .with_reporter(reporter);

    let mut report = BuildReport::new();
    for &variant in mode.variants() {
        report.merge(orchestrator.build_all(context, variant));
    }
    report
}

/// Process exit status for a finished build.
pub fn exit_status(report: &BuildReport) -> u8 {
    if report.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_ERROR
    }
}

fn report_fatal(reporter: &dyn ProgressReporter, error: &ConfigError) {
    reporter.report(ProgressEvent::Error { target_id: None, message: error.to_string() });
}
