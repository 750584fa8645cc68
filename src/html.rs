//! Markup stripping for calendar summaries.

/// Render width passed to html2text; wide enough that wrapping never
/// splits a summary mid-line before the whitespace collapse below.
const RENDER_WIDTH: usize = 4096;

/// Flatten possibly-marked-up text into a single plain-text line.
///
/// Summary metadata is frequently rendered HTML; calendar SUMMARY values
/// must be plain text. Input the renderer cannot handle is passed through
/// unchanged rather than failing the build.
pub fn strip_markup(raw: &str) -> String {
    let text = html2text::from_read(raw.as_bytes(), RENDER_WIDTH)
        .unwrap_or_else(|_| raw.to_string());
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
