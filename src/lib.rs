//! moekit - Asset build system for the OpenList Moe theme
//!
//! This library provides functionality to:
//! - Resolve release metadata and stamp it into source headers
//! - Compile SCSS and minify CSS and JavaScript
//! - Build every asset kind in parallel and report per-target outcomes

pub mod build;
pub mod cli;
pub mod config;
