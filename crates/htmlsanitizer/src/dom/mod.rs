// ABOUTME: Adapter over the scraper/html5ever parser used by the sanitizer and text extractor.
// ABOUTME: Handles input decoding, document parsing, body lookup, escaping, and void elements.

//! Parser collaborator.
//!
//! Tokenizing and tree construction are delegated to `scraper`; this module
//! turns raw input into a parsed document, locates the content root and
//! provides the escaping helpers used during serialization.

pub mod attrs;
pub mod scheme;

use std::borrow::Cow;
use std::io::Read;

use ego_tree::NodeRef;
use scraper::{Html, Node};

use crate::error::{Result, SanitizeError};

/// Parse a complete document. html5ever recovers from any malformed
/// markup, so parsing itself cannot fail.
pub(crate) fn parse_document(input: &str) -> Html {
    Html::parse_document(input)
}

/// Returns the `<body>` element, or the document root when the parser did
/// not produce one (e.g. frameset documents).
pub(crate) fn content_root(doc: &Html) -> NodeRef<'_, Node> {
    doc.tree
        .root()
        .descendants()
        .find(|node| matches!(node.value(), Node::Element(el) if el.name() == "body"))
        .unwrap_or_else(|| doc.tree.root())
}

/// Read the whole stream and decode it to UTF-8.
pub(crate) fn read_input<R: Read>(mut reader: R, op: &str) -> Result<String> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| SanitizeError::read(op, Some(e.into())))?;
    Ok(decode_input(&buf))
}

/// Decode input bytes using a BOM if present, UTF-8 if valid, and charset
/// detection otherwise.
pub(crate) fn decode_input(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    // Use chardetng for detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Escape text content (`&`, `<`, `>`).
pub(crate) fn escape_text(s: &str) -> Cow<'_, str> {
    htmlize::escape_text(s)
}

/// Escape a double-quoted attribute value (`&`, `<`, `>`, `"`).
pub(crate) fn escape_attr(s: &str) -> Cow<'_, str> {
    htmlize::escape_attribute(s)
}

/// Check if tag is void element
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_name(doc: &Html) -> Option<String> {
        match content_root(doc).value() {
            Node::Element(el) => Some(el.name().to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_content_root_is_body() {
        let doc = parse_document("<p>hi</p>");
        assert_eq!(root_name(&doc).as_deref(), Some("body"));
    }

    #[test]
    fn test_content_root_falls_back_to_document() {
        let doc = parse_document("<frameset><frame src=\"a.html\"></frameset>");
        assert_eq!(root_name(&doc), None);
        assert!(matches!(content_root(&doc).value(), Node::Document));
    }

    #[test]
    fn test_decode_utf8_and_bom() {
        assert_eq!(decode_input("héllo".as_bytes()), "héllo");
        let with_bom = [0xEF, 0xBB, 0xBF, b'o', b'k'];
        assert_eq!(decode_input(&with_bom), "ok");
    }

    #[test]
    fn test_decode_iso_8859_1_with_chardetng() {
        // ISO-8859-1 encoded "café" (e-acute = 0xe9)
        let iso_bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        assert_eq!(decode_input(iso_bytes), "café");
    }

    #[test]
    fn test_read_input_propagates_io_errors() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }
        let err = read_input(Failing, "sanitize_reader").unwrap_err();
        assert!(err.is_read());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; \"c\"");
        assert_eq!(escape_attr("say \"hi\" & <go>"), "say &quot;hi&quot; &amp; &lt;go&gt;");
    }

    #[test]
    fn test_is_void_element() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(!is_void_element("p"));
        assert!(!is_void_element("script"));
    }
}
