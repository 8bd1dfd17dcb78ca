//! Build target definitions.
//!
//! An asset target is one configured source file (stylesheet or script)
//! together with the directory and filenames its artifacts are written to.

use std::path::{Path, PathBuf};

/// Kind of asset the pipeline knows how to build.
///
/// The set is closed; per-kind behaviour is selected with `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// SCSS stylesheet, compiled to CSS
    Style,
    /// JavaScript, already in its target syntax
    Script,
}

impl AssetKind {
    /// Decorative glyph shown next to the kind in console output.
    pub fn glyph(&self) -> &'static str {
        match self {
            AssetKind::Style => "🎨",
            AssetKind::Script => "⚡",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Style => "CSS",
            AssetKind::Script => "JS",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Style => write!(f, "style"),
            AssetKind::Script => write!(f, "script"),
        }
    }
}

/// Artifact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Unminified artifact
    Development,
    /// Minified artifact
    Production,
}

impl Variant {
    /// Whether this variant runs the minifier.
    pub fn is_minified(&self) -> bool {
        matches!(self, Variant::Production)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Development => write!(f, "dev"),
            Variant::Production => write!(f, "prod"),
        }
    }
}

/// A configured asset: where it is read from and where it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTarget {
    /// What kind of asset this is
    pub kind: AssetKind,
    /// Source file
    pub input: PathBuf,
    /// Directory both artifacts are written into
    pub out_dir: PathBuf,
    /// Development artifact filename
    pub dev_file: String,
    /// Production artifact filename
    pub prod_file: String,
}

impl AssetTarget {
    /// Identifier used in reports, e.g. `style:prod`.
    pub fn id(&self, variant: Variant) -> String {
        format!("{}:{}", self.kind, variant)
    }

    /// Artifact filename for a variant.
    pub fn file_name(&self, variant: Variant) -> &str {
        match variant {
            Variant::Development => &self.dev_file,
            Variant::Production => &self.prod_file,
        }
    }

    /// Full artifact path for a variant.
    pub fn output_path(&self, variant: Variant) -> PathBuf {
        self.out_dir.join(self.file_name(variant))
    }

    /// Directory the style compiler resolves `@use` and `@import` from.
    ///
    /// The input's parent, or the working directory for a bare filename.
    pub fn load_dir(&self) -> PathBuf {
        self.input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_target() -> AssetTarget {
        AssetTarget {
            kind: AssetKind::Style,
            input: PathBuf::from("src/styles/main.scss"),
            out_dir: PathBuf::from("dist/css"),
            dev_file: "OpenList-Moe.css".to_string(),
            prod_file: "OpenList-Moe.min.css".to_string(),
        }
    }

    #[test]
    fn test_asset_kind_display() {
        assert_eq!(AssetKind::Style.to_string(), "style");
        assert_eq!(AssetKind::Script.to_string(), "script");
        assert_eq!(AssetKind::Style.label(), "CSS");
        assert_eq!(AssetKind::Script.label(), "JS");
    }

    #[test]
    fn test_variant_is_minified() {
        assert!(Variant::Production.is_minified());
        assert!(!Variant::Development.is_minified());
    }

    #[test]
    fn test_load_dir_is_input_parent() {
        assert_eq!(style_target().load_dir(), PathBuf::from("src/styles"));
    }

    #[test]
    fn test_load_dir_for_bare_filename() {
        let mut target = style_target();
        target.input = PathBuf::from("main.scss");
        assert_eq!(target.load_dir(), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_target_id() {
        let target = style_target();
        assert_eq!(target.id(Variant::Development), "style:dev");
        assert_eq!(target.id(Variant::Production), "style:prod");
    }

    #[test]
    fn test_target_output_path_per_variant() {
        let target = style_target();
        assert_eq!(
            target.output_path(Variant::Development),
            PathBuf::from("dist/css/OpenList-Moe.css")
        );
        assert_eq!(
            target.output_path(Variant::Production),
            PathBuf::from("dist/css/OpenList-Moe.min.css")
        );
    }
}
