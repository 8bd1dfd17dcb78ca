//! Per-kind compilation.
//!
//! Stylesheets are SCSS and go through a style compiler. Scripts are already
//! JavaScript, so compiling them is the identity.

use crate::build::AssetKind;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Style compilation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SCSS compilation failed: {message}")]
pub struct CompileError {
    /// Diagnostic from the compiler
    pub message: String,
}

/// Compiles SCSS text into plain CSS in expanded (unminified) form.
pub trait StyleCompiler: Send + Sync {
    /// Compile `source`. `load_dir` is where `@use` and `@import` are resolved.
    fn compile_style(&self, source: &str, load_dir: &Path) -> Result<String, CompileError>;
}

/// [`StyleCompiler`] backed by the `grass` Sass implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrassCompiler;

impl GrassCompiler {
    /// Create a new grass-backed compiler.
    pub fn new() -> Self {
        Self
    }
}

impl StyleCompiler for GrassCompiler {
    fn compile_style(&self, source: &str, load_dir: &Path) -> Result<String, CompileError> {
        let options = grass::Options::default()
            .style(grass::OutputStyle::Expanded)
            .load_path(load_dir)
            .quiet(true);

        grass::from_string(source.to_string(), &options)
            .map_err(|e| CompileError { message: e.to_string() })
    }
}

fn charset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)@charset\s+["']UTF-8["'];?\s*"#).expect("charset pattern is valid")
    })
}

/// Remove charset declarations and a leading byte-order mark.
///
/// The artifact header already sits above the compiled CSS, so a
/// `@charset` rule would no longer be the first thing in the file.
pub fn strip_charset(css: &str) -> String {
    let css = css.strip_prefix('\u{FEFF}').unwrap_or(css);
    charset_pattern().replace_all(css, "").into_owned()
}

/// Compile a substituted body for its asset kind.
pub fn compile(
    kind: AssetKind,
    body: &str,
    compiler: &dyn StyleCompiler,
    load_dir: &Path,
) -> Result<String, CompileError> {
    match kind {
        AssetKind::Style => compiler.compile_style(body, load_dir).map(|css| strip_charset(&css)),
        AssetKind::Script => Ok(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingCompiler;

    impl StyleCompiler for FailingCompiler {
        fn compile_style(&self, _source: &str, _load_dir: &Path) -> Result<String, CompileError> {
            Err(CompileError { message: "unexpected }".to_string() })
        }
    }

    #[test]
    fn test_grass_compiles_nested_rules_expanded() {
        let scss = "$accent: #ff6699;\n.card {\n  .title { color: $accent; }\n}\n";
        let css = compile(AssetKind::Style, scss, &GrassCompiler::new(), Path::new(".")).unwrap();
        assert!(css.contains(".card .title {"));
        assert!(css.contains("color: #ff6699;"));
        assert!(css.contains('\n'));
    }

    #[test]
    fn test_grass_reports_syntax_error() {
        let err = compile(AssetKind::Style, ".a { color: red; ", &GrassCompiler::new(), Path::new("."))
            .unwrap_err();
        assert!(err.to_string().starts_with("SCSS compilation failed"));
    }

    #[test]
    fn test_compiled_css_has_no_charset() {
        let scss = ".a::after { content: \"朱茱\"; }";
        let css = compile(AssetKind::Style, scss, &GrassCompiler::new(), Path::new(".")).unwrap();
        assert!(!css.to_lowercase().contains("@charset"));
        assert!(!css.starts_with('\u{FEFF}'));
        assert!(css.contains("朱茱"));
    }

    #[test]
    fn test_strip_charset_variants() {
        assert_eq!(strip_charset("@charset \"UTF-8\";\n.a{}"), ".a{}");
        assert_eq!(strip_charset("@CHARSET 'utf-8';.a{}"), ".a{}");
        assert_eq!(strip_charset("\u{FEFF}.a{}"), ".a{}");
        assert_eq!(strip_charset(".a{}"), ".a{}");
    }

    #[test]
    fn test_script_compile_is_identity() {
        let js = "window.addEventListener('load', () => {});";
        let out = compile(AssetKind::Script, js, &FailingCompiler, Path::new(".")).unwrap();
        assert_eq!(out, js);
    }

    #[test]
    fn test_style_compile_error_propagates() {
        let err = compile(AssetKind::Style, ".a{}", &FailingCompiler, Path::new(".")).unwrap_err();
        assert_eq!(err.message, "unexpected }");
    }
}
