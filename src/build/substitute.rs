//! Placeholder substitution.
//!
//! Sources carry `{{NAME}}` markers that are replaced with build metadata.
//! Replacement is a single left-to-right pass, so a value that happens to
//! look like a marker is never expanded again.

use crate::build::BuildContext;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Marker replaced with the package version.
pub const VERSION_MARKER: &str = "{{MOE_VERSION}}";
/// Marker replaced with the version log label.
pub const VERSION_LOG_MARKER: &str = "{{MOE_VERSION_LOG}}";
/// Marker replaced with the upstream compatibility version.
pub const UPSTREAM_MARKER: &str = "{{OP_VERSION}}";
/// Marker replaced with the build timestamp.
pub const TIMESTAMP_MARKER: &str = "{{TIMESTAMP}}";

/// Bare identifier in script bodies rewritten to a quoted version string.
pub const SCRIPT_VERSION_SENTINEL: &str = "MOE_VERSION";

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{[A-Za-z0-9_]+\}\}").expect("marker pattern is valid"))
}

/// Scans script text token by token: comments, string and template literals
/// are matched whole so the sentinel inside them is skipped. A sentinel with a
/// leading `.` or an adjoining `$` belongs to a longer expression.
fn sentinel_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r#"//[^\n]*|/\*[\s\S]*?\*/|"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\[\s\S])*`|(?P<lead>\.\s*|\$)?\b(?P<name>{})\b(?P<tail>\$)?"#,
            SCRIPT_VERSION_SENTINEL
        ))
        .expect("sentinel pattern is valid")
    })
}

/// Value for a whole `{{NAME}}` marker, or `None` if it is not recognised.
fn lookup<'a>(marker: &str, context: &'a BuildContext) -> Option<&'a str> {
    match marker {
        VERSION_MARKER => Some(context.package_version()),
        VERSION_LOG_MARKER => Some(context.version_log_label()),
        UPSTREAM_MARKER => Some(context.upstream_compat_version()),
        TIMESTAMP_MARKER => Some(context.timestamp()),
        _ => None,
    }
}

/// Replace every recognised marker in `text` with its context value.
///
/// Unknown markers and all other text are copied through unchanged.
pub fn substitute(text: &str, context: &BuildContext) -> String {
    marker_pattern()
        .replace_all(text, |caps: &Captures| match lookup(&caps[0], context) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitution for script bodies.
///
/// Runs [`substitute`], then turns each bare `MOE_VERSION` identifier into a
/// double-quoted string literal holding the package version. Property names,
/// comments and string or template literals are left alone, including
/// `${}` interpolations inside template literals.
pub fn substitute_script(text: &str, context: &BuildContext) -> String {
    let substituted = substitute(text, context);
    let literal = format!("\"{}\"", escape_js_string(context.package_version()));
    sentinel_pattern()
        .replace_all(&substituted, |caps: &Captures| {
            let bare = caps.name("name").is_some()
                && caps.name("lead").is_none()
                && caps.name("tail").is_none();
            if bare {
                literal.clone()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn escape_js_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
