//! Command-line interface implementation
//!
//! Parses the build mode and dispatches to the build command.

mod build;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::build::BuildMode;

pub use build::{build_project, exit_status, load_project, run_build};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_INVALID_ARGS: u8 = 2;

/// moe - Build the OpenList Moe theme assets
#[derive(Parser, Debug)]
#[command(name = "moe")]
#[command(about = "Compile, stamp and minify the OpenList Moe stylesheet and script")]
#[command(version)]
pub struct Cli {
    /// Build mode: `dev` and `prod` build locally, `ci` builds a release
    #[arg(value_enum, default_value_t = BuildMode::Prod)]
    pub mode: BuildMode,

    /// Path to moe.toml (default: search upwards from the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print which configuration is used
    #[arg(short, long)]
    pub verbose: bool,
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    run_build(cli.mode, cli.config.as_deref(), cli.verbose)
}
