// ABOUTME: Converts plain-text http/https URLs inside text nodes into anchor elements.
// ABOUTME: Everything outside the matched URLs is HTML-escaped and emitted unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{escape_attr, escape_text};

/// Relation attribute added to generated links.
pub const LINK_REL: &str = "noopener noreferrer";

// Scheme, then a run without whitespace/angle brackets/quotes, not ending in
// sentence punctuation.
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+[^\s<>".,;:!?)\]]"#).unwrap());

/// Writes `text` to `out`, wrapping every URL in an `<a>` element.
pub fn write_linked_text(out: &mut String, text: &str) {
    let mut last = 0;
    for m in URL_RE.find_iter(text) {
        out.push_str(&escape_text(&text[last..m.start()]));
        let url = m.as_str();
        out.push_str("<a href=\"");
        out.push_str(&escape_attr(url));
        out.push_str("\" rel=\"");
        out.push_str(LINK_REL);
        out.push_str("\">");
        out.push_str(&escape_text(url));
        out.push_str("</a>");
        last = m.end();
    }
    out.push_str(&escape_text(&text[last..]));
}

/// Convenience wrapper returning a new string.
pub fn linkify_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    write_linked_text(&mut out, text);
    out
}
