//! Source documents and the header/body split.

/// Split `source` into its first `header_lines` lines and the remainder.
///
/// Lines are the pieces between `\n` separators. When there are more pieces
/// than `header_lines`, `format!("{header}\n{body}")` reproduces `source`
/// exactly. Otherwise the whole source is the header and the body is empty.
pub fn split(source: &str, header_lines: usize) -> (&str, &str) {
    if header_lines == 0 {
        return ("", source);
    }

    match source.match_indices('\n').nth(header_lines - 1) {
        Some((idx, _)) => (&source[..idx], &source[idx + 1..]),
        None => (source, ""),
    }
}

/// Normalise CRLF line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// A source file split into its license header and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Leading header region, never compiled or minified
    pub header: String,
    /// Everything after the header
    pub body: String,
}

impl SourceDocument {
    /// Normalise line endings and split raw file text.
    pub fn parse(raw: &str, header_lines: usize) -> Self {
        let text = normalize_newlines(raw);
        let (header, body) = split(&text, header_lines);
        Self { header: header.to_string(), body: body.to_string() }
    }
}
