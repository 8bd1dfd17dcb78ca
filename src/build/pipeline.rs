//! Single-target build pipeline.
//!
//! Builds one asset kind in one variant: read, split, substitute, compile,
//! minify (production only), assemble, write. Every error is caught here and
//! recorded in the returned [`BuildOutcome`].

use crate::build::{
    compile, substitute, substitute_script, AssetKind, AssetTarget, BuildContext, BuildOutcome,
    CompileError, MinifyError, Minifier, SizeStats, SourceDocument, StyleCompiler, Variant,
};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Error that stops a single target.
///
/// Scoped to the target that raised it; sibling targets keep building.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Source file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Source path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Output directory could not be created
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Artifact could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Artifact path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Style compilation failed
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// Minification failed
    #[error(transparent)]
    Minify(#[from] MinifyError),
    /// Builder thread panicked
    #[error("Build panicked: {0}")]
    Panicked(String),
}

/// Join a header and a body with exactly one blank line between them.
///
/// Leading blank lines of the body are dropped and the artifact ends with a
/// single newline.
pub fn assemble(header: &str, body: &str) -> String {
    let header = header.trim_end_matches('\n');
    let body = body.trim_start_matches('\n').trim_end_matches('\n');

    match (header.is_empty(), body.is_empty()) {
        (true, _) => format!("{}\n", body),
        (false, true) => format!("{}\n", header),
        (false, false) => format!("{}\n\n{}\n", header, body),
    }
}

/// Builds single targets with shared collaborators.
#[derive(Clone, Copy)]
pub struct TargetBuilder<'a> {
    header_lines: usize,
    compiler: &'a dyn StyleCompiler,
    minifier: &'a dyn Minifier,
}

impl<'a> TargetBuilder<'a> {
    /// Create a builder.
    pub fn new(
        header_lines: usize,
        compiler: &'a dyn StyleCompiler,
        minifier: &'a dyn Minifier,
    ) -> Self {
        Self { header_lines, compiler, minifier }
    }

    /// Build one target in one variant.
    ///
    /// Never fails: errors end up in the outcome. Elapsed time covers the
    /// whole run, including failed ones.
    pub fn build(
        &self,
        target: &AssetTarget,
        context: &BuildContext,
        variant: Variant,
    ) -> BuildOutcome {
        let start = Instant::now();
        debug!(target_id = %target.id(variant), input = %target.input.display(), "building");

        match self.run(target, context, variant) {
            Ok((path, sizes)) => {
                debug!(target_id = %target.id(variant), output = %path.display(), "built");
                BuildOutcome::success(target.kind, variant, path, sizes, start.elapsed())
            }
            Err(error) => {
                warn!(target_id = %target.id(variant), %error, "build failed");
                BuildOutcome::failed(target.kind, variant, error, start.elapsed())
            }
        }
    }

    fn run(
        &self,
        target: &AssetTarget,
        context: &BuildContext,
        variant: Variant,
    ) -> Result<(PathBuf, SizeStats), BuildError> {
        let raw = fs::read_to_string(&target.input)
            .map_err(|source| BuildError::Read { path: target.input.clone(), source })?;
        let doc = SourceDocument::parse(&raw, self.header_lines);

        let header = substitute(&doc.header, context);
        let body = match target.kind {
            AssetKind::Style => substitute(&doc.body, context),
            AssetKind::Script => substitute_script(&doc.body, context),
        };

        let compiled = compile(target.kind, &body, self.compiler, &target.load_dir())?;
        let compiled_bytes = compiled.len();

        let body = if variant.is_minified() {
            self.minifier.minify(&compiled, target.kind)?
        } else {
            compiled
        };

        let artifact = assemble(&header, &body);

        fs::create_dir_all(&target.out_dir)
            .map_err(|source| BuildError::CreateDir { path: target.out_dir.clone(), source })?;

        let path = target.output_path(variant);
        fs::write(&path, &artifact)
            .map_err(|source| BuildError::Write { path: path.clone(), source })?;

        Ok((path, SizeStats { compiled_bytes, artifact_bytes: artifact.len() }))
    }
}
