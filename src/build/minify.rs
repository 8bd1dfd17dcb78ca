//! Minification of compiled artifact bodies.
//!
//! Only the production variant is minified. The header is never passed
//! through here.

use crate::build::AssetKind;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier as OxcMinifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use thiserror::Error;

/// Minifier rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} minification failed: {message}", kind.label())]
pub struct MinifyError {
    /// Kind of content that failed
    pub kind: AssetKind,
    /// Diagnostic from the underlying tool
    pub message: String,
}

/// Minifies compiled text for an asset kind.
pub trait Minifier: Send + Sync {
    /// Minify `text`, which is compiled output of the given kind.
    fn minify(&self, text: &str, kind: AssetKind) -> Result<String, MinifyError>;
}

/// Local minifier: lightningcss for CSS, oxc for JavaScript.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeMinifier;

impl NativeMinifier {
    /// Create a new minifier.
    pub fn new() -> Self {
        Self
    }
}

impl Minifier for NativeMinifier {
    fn minify(&self, text: &str, kind: AssetKind) -> Result<String, MinifyError> {
        let result = match kind {
            AssetKind::Style => minify_css(text),
            AssetKind::Script => minify_js(text),
        };
        result.map_err(|message| MinifyError { kind, message })
    }
}

/// Minify CSS with lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    let mut sheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| e.to_string())?;
    sheet.minify(MinifyOptions::default()).map_err(|e| e.to_string())?;
    let printed = sheet
        .to_css(PrinterOptions { minify: true, ..Default::default() })
        .map_err(|e| e.to_string())?;
    Ok(printed.code)
}

/// Minify a classic (non-module) script with oxc.
///
/// Top-level names are kept since other scripts on the page may use them.
pub fn minify_js(js: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, js, SourceType::cjs()).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        if messages.is_empty() {
            return Err("parser aborted".to_string());
        }
        return Err(messages.join("; "));
    }

    let mut program = parsed.program;
    let minified = OxcMinifier::new(MinifierOptions::default()).build(&allocator, &mut program);

    let code = Codegen::new()
        .with_options(CodegenOptions::minify())
        .with_scoping(minified.scoping)
        .build(&program)
        .code;
    Ok(code)
}
