//! Build pipeline module for moekit
//!
//! Turns the theme's SCSS and JavaScript sources into versioned artifacts
//! under `dist/`.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Context**: Resolve versions and the timestamp once per invocation
//! - **Target build**: Split, substitute, compile, minify and write one artifact
//! - **Orchestration**: Build every target in parallel and collect a report
//!
//! # Example
//!
//! ```ignore
//! use moekit::build::{BuildContext, BuildMode, GrassCompiler, NativeMinifier, Orchestrator, Variant};
//! use moekit::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::resolve(BuildMode::Prod, &config.release)?;
//! let orchestrator = Orchestrator::new(
//!     config.targets(&project_root),
//!     config.build.header_lines,
//!     Box::new(GrassCompiler),
//!     Box::new(NativeMinifier),
//! );
//!
//! let report = orchestrator.build_all(&context, Variant::Production);
//! println!("{}", report.summary());
//! ```

pub mod compile;
pub mod context;
pub mod minify;
pub mod parallel;
pub mod pipeline;
pub mod progress;
pub mod result;
pub mod source;
pub mod substitute;
pub mod target;

pub use compile::*;
pub use context::*;
pub use minify::*;
pub use parallel::*;
pub use pipeline::*;
pub use result::*;
pub use source::*;
pub use substitute::*;
pub use target::*;
