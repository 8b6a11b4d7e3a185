// ABOUTME: Plain-text extraction that drops every tag and keeps only text-node content.
// ABOUTME: Character references are already decoded by the parser; no policy is consulted.

use std::io::Read;

use scraper::Node;

use crate::dom::{content_root, parse_document, read_input};
use crate::error::Result;

/// Removes all HTML tags from `input` and returns the concatenated text.
///
/// ```
/// let text = htmlsanitizer::strip_tags("<p>Hello <b>world</b></p>").unwrap();
/// assert_eq!(text, "Hello world");
/// ```
pub fn strip_tags(input: &str) -> Result<String> {
    let doc = parse_document(input);
    let text = content_root(&doc)
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect();
    Ok(text)
}

/// Streaming variant of [`strip_tags`].
pub fn strip_tags_reader<R: Read>(reader: R) -> Result<String> {
    let input = read_input(reader, "strip_tags_reader")?;
    strip_tags(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_basic() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>").unwrap(), "Hello world");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            strip_tags("<p>Tom &amp; Jerry &lt;3 &#169;</p>").unwrap(),
            "Tom & Jerry <3 ©"
        );
    }

    #[test]
    fn test_comments_and_attributes_ignored() {
        assert_eq!(
            strip_tags(r#"<a href="https://x.com" title="t">a<!-- c -->b</a>"#).unwrap(),
            "ab"
        );
    }

    #[test]
    fn test_head_content_excluded() {
        assert_eq!(
            strip_tags("<title>Title</title><p>Body</p>").unwrap(),
            "Body"
        );
    }

    #[test]
    fn test_whitespace_preserved() {
        assert_eq!(strip_tags("<p>a\n  b</p>").unwrap(), "a\n  b");
    }

    #[test]
    fn test_reader() {
        assert_eq!(strip_tags_reader(&b"<i>x</i>y"[..]).unwrap(), "xy");
    }
}
