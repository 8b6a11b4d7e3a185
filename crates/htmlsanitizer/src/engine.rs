// ABOUTME: Policy-enforcing tree walker that rewrites a parsed document into sanitized HTML.
// ABOUTME: Classifies each node, filters attributes, runs transformers, enforces depth, serializes.

//! Sanitization engine.
//!
//! The walk is depth-first, emitting open tags on the way down and closing
//! tags on the way back up. It is driven by an explicit work stack rather
//! than call recursion, so the nesting depth of the input cannot exhaust the
//! thread's stack even when the policy sets no depth limit.

use std::io::Read;

use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::{debug, trace};

use crate::dom::attrs::filter_attributes;
use crate::dom::{
    content_root, escape_attr, escape_text, is_void_element, parse_document, read_input,
};
use crate::error::Result;
use crate::linkify::write_linked_text;
use crate::policy::{shared_default, Policy};
use crate::transform::{run_pipeline, Element};

/// Parses `input`, applies `policy` and returns the sanitized HTML.
///
/// Passing `None` uses the permissive preset.
///
/// ```
/// use htmlsanitizer::{default_policy, sanitize};
///
/// let clean = sanitize("<b>Hello</b> <script>alert('xss')</script>", &default_policy()).unwrap();
/// assert_eq!(clean, "<b>Hello</b> ");
/// ```
pub fn sanitize<'p>(input: &str, policy: impl Into<Option<&'p Policy>>) -> Result<String> {
    let policy = policy.into().unwrap_or_else(|| shared_default());
    let doc = parse_document(input);
    Ok(sanitize_document(&doc, policy))
}

/// Reads HTML from `reader`, applies `policy` and returns the sanitized HTML.
///
/// Fails only when the reader fails; no partial output is returned.
pub fn sanitize_reader<'p, R: Read>(
    reader: R,
    policy: impl Into<Option<&'p Policy>>,
) -> Result<String> {
    let input = read_input(reader, "sanitize_reader")?;
    sanitize(&input, policy)
}

/// Sanitizes an already parsed document, starting below its `<body>`.
pub fn sanitize_document(doc: &Html, policy: &Policy) -> String {
    let walker = Walker {
        policy,
        out: String::new(),
        linkify: policy.linkify() && policy.allows_tag("a"),
        open_anchors: 0,
    };
    let out = walker.run(content_root(doc));
    trace!(len = out.len(), "sanitized document");
    out
}

enum Step<'a> {
    Visit(NodeRef<'a, Node>, usize),
    Close { markup: String, anchor: bool },
}

struct Walker<'p> {
    policy: &'p Policy,
    out: String,
    // Generated anchors must survive a second pass, so `a` has to be allowed.
    linkify: bool,
    // Live <a> elements currently open; text inside them is not linkified.
    open_anchors: usize,
}

impl<'p> Walker<'p> {
    fn run(mut self, root: NodeRef<'_, Node>) -> String {
        let mut stack = Vec::new();
        push_children(&mut stack, root, 1);

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(node, depth) => self.visit(node, depth, &mut stack),
                Step::Close { markup, anchor } => {
                    self.out.push_str(&markup);
                    if anchor {
                        self.open_anchors -= 1;
                    }
                }
            }
        }
        self.out
    }

    fn visit<'a>(&mut self, node: NodeRef<'a, Node>, depth: usize, stack: &mut Vec<Step<'a>>) {
        match node.value() {
            Node::Text(text) => self.write_text(text),
            Node::Element(el) => self.visit_element(node, el, depth, stack),
            Node::Document => push_children(stack, node, depth),
            Node::Doctype(_) | Node::Comment(_) => {}
            _ => push_children(stack, node, depth),
        }
    }

    fn write_text(&mut self, text: &str) {
        if self.linkify && self.open_anchors == 0 {
            write_linked_text(&mut self.out, text);
        } else {
            self.out.push_str(&escape_text(text));
        }
    }

    fn visit_element<'a>(
        &mut self,
        node: NodeRef<'a, Node>,
        el: &scraper::node::Element,
        depth: usize,
        stack: &mut Vec<Step<'a>>,
    ) {
        let tag = el.name().to_ascii_lowercase();
        let allowed = self.policy.allows_tag(&tag) && self.policy.within_depth(depth);

        if allowed {
            let attrs = filter_attributes(&tag, el.attrs(), self.policy);
            let Some(element) =
                run_pipeline(self.policy.transformers(), Element::with_attrs(&tag, attrs))
            else {
                return;
            };

            write_open_tag(&mut self.out, &element);
            if is_void_element(element.tag()) {
                self.out.push_str(" />");
                return;
            }
            self.out.push('>');
            if drops_leading_newline(element.tag()) && starts_with_newline(node) {
                self.out.push('\n');
            }

            let anchor = element.tag() == "a";
            if anchor {
                self.open_anchors += 1;
            }
            stack.push(Step::Close {
                markup: format!("</{}>", element.tag()),
                anchor,
            });
            push_children(stack, node, depth + 1);
            return;
        }

        if self.policy.strip_disallowed() || self.policy.cleans_content(&tag) {
            debug!(tag = %tag, depth, "removed disallowed element");
            return;
        }

        debug!(tag = %tag, depth, "escaped disallowed element");
        self.out.push_str(&escape_text(&render_open_tag(el)));
        if !is_void_element(&tag) {
            stack.push(Step::Close {
                markup: escape_text(&format!("</{}>", tag)).into_owned(),
                anchor: false,
            });
        }
        push_children(stack, node, depth + 1);
    }
}

/// Queue children so that the first child is popped first.
fn push_children<'a>(stack: &mut Vec<Step<'a>>, node: NodeRef<'a, Node>, depth: usize) {
    stack.extend(node.children().rev().map(|child| Step::Visit(child, depth)));
}

/// Elements whose first newline is swallowed by the parser.
fn drops_leading_newline(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea" | "listing")
}

fn starts_with_newline(node: NodeRef<'_, Node>) -> bool {
    matches!(
        node.first_child().map(|child| child.value()),
        Some(Node::Text(text)) if text.starts_with('\n')
    )
}

fn write_open_tag(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.tag());
    for attr in element.attrs() {
        out.push(' ');
        out.push_str(&attr.key);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }
}

/// The element's open tag as received, attribute values unfiltered and
/// unescaped. Only ever emitted through `escape_text`.
fn render_open_tag(el: &scraper::node::Element) -> String {
    let mut s = String::new();
    s.push('<');
    s.push_str(el.name());
    for (name, value) in el.attrs() {
        s.push(' ');
        s.push_str(name);
        s.push_str("=\"");
        s.push_str(value);
        s.push('"');
    }
    s.push('>');
    s
}
