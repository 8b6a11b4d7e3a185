// ABOUTME: Sanitization policy model with the permissive and strict presets.
// ABOUTME: PolicyBuilder provides a fluent API for constructing immutable Policy values.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::transform::Transformer;

/// Attribute allow-list key that applies to every tag.
pub const ANY_TAG: &str = "*";

/// Tags whose disallowed elements lose their content even in escape mode.
const DEFAULT_CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

const PERMISSIVE_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "b", "i", "em", "strong", "u", "s",
    "strike", "del", "ins", "a", "img", "ul", "ol", "li", "table", "thead", "tbody", "tfoot",
    "tr", "th", "td", "code", "pre", "kbd", "samp", "blockquote", "cite", "q", "figure",
    "figcaption", "div", "span", "section", "article", "header", "footer", "details",
    "summary", "abbr", "acronym", "address", "sup", "sub",
];

const PERMISSIVE_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target", "rel"]),
    ("img", &["src", "alt", "title", "width", "height", "loading"]),
    ("td", &["colspan", "rowspan", "align", "valign"]),
    ("th", &["colspan", "rowspan", "align", "valign", "scope"]),
    ("blockquote", &["cite"]),
    ("q", &["cite"]),
    ("abbr", &["title"]),
    ("acronym", &["title"]),
    (ANY_TAG, &["id", "class", "lang", "dir"]),
];

const STRICT_TAGS: &[&str] = &["b", "i", "em", "strong", "br", "p", "ul", "ol", "li"];

static DEFAULT_POLICY: Lazy<Policy> = Lazy::new(build_permissive);
static STRICT_POLICY: Lazy<Policy> = Lazy::new(build_strict);

/// Defines what HTML is considered safe.
///
/// A policy is immutable once built and can be shared freely between
/// threads. Use [`Policy::builder`] for a blank policy, or start from a
/// preset with [`default_policy`]/[`strict_policy`] and
/// [`Policy::to_builder`].
#[derive(Clone)]
pub struct Policy {
    pub(crate) allowed_tags: HashSet<String>,
    pub(crate) allowed_attributes: HashMap<String, HashSet<String>>,
    pub(crate) allowed_schemes: HashSet<String>,
    pub(crate) strip_disallowed: bool,
    pub(crate) clean_content_tags: HashSet<String>,
    pub(crate) transformers: Vec<Arc<dyn Transformer>>,
    pub(crate) linkify: bool,
    pub(crate) max_depth: usize,
}

impl Policy {
    /// Start a blank policy: nothing allowed, escape mode, script and style
    /// content cleaned.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Reopen a copy of this policy for customization.
    pub fn to_builder(&self) -> PolicyBuilder {
        PolicyBuilder {
            policy: self.clone(),
        }
    }

    /// Returns true if the tag is on the allow-list (case-insensitive).
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Returns true if the attribute is allowed on the tag, either by the
    /// tag's own entry or by the wildcard entry.
    pub fn allows_attribute(&self, tag: &str, key: &str) -> bool {
        let in_list = |list_key: &str| {
            self.allowed_attributes
                .get(list_key)
                .is_some_and(|set| set.contains(key))
        };
        in_list(ANY_TAG) || in_list(&tag.to_ascii_lowercase())
    }

    /// Returns true if the URL scheme is allowed (case-insensitive).
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.allowed_schemes.contains(&scheme.to_ascii_lowercase())
    }

    /// Returns true if a disallowed element with this tag must lose its content.
    pub fn cleans_content(&self, tag: &str) -> bool {
        self.clean_content_tags.contains(&tag.to_ascii_lowercase())
    }

    pub fn strip_disallowed(&self) -> bool {
        self.strip_disallowed
    }

    pub fn linkify(&self) -> bool {
        self.linkify
    }

    /// Maximum element nesting depth; 0 means unlimited.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if an element at `depth` is within the depth limit.
    pub fn within_depth(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }

    pub fn transformers(&self) -> &[Arc<dyn Transformer>] {
        &self.transformers
    }
}

impl Default for Policy {
    /// The permissive preset.
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("allowed_tags", &self.allowed_tags)
            .field("allowed_attributes", &self.allowed_attributes)
            .field("allowed_schemes", &self.allowed_schemes)
            .field("strip_disallowed", &self.strip_disallowed)
            .field("clean_content_tags", &self.clean_content_tags)
            .field("transformers", &self.transformers.len())
            .field("linkify", &self.linkify)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Builder for constructing [`Policy`] values.
///
/// Tag names, attribute-list keys and schemes are lower-cased on the way
/// in; attribute names are stored as given.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    /// Create a builder for a blank policy.
    pub fn new() -> Self {
        Self {
            policy: Policy {
                allowed_tags: HashSet::new(),
                allowed_attributes: HashMap::new(),
                allowed_schemes: HashSet::new(),
                strip_disallowed: false,
                clean_content_tags: lower_set(DEFAULT_CLEAN_CONTENT_TAGS.iter()),
                transformers: Vec::new(),
                linkify: false,
                max_depth: 0,
            },
        }
    }

    /// Add tags to the allow-list.
    pub fn allow_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.allowed_tags.extend(lower_set(tags));
        self
    }

    /// Allow attributes on a tag, or on every tag when `tag` is [`ANY_TAG`].
    pub fn allow_attributes<I, S>(mut self, tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy
            .allowed_attributes
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .extend(attrs.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// Add URL schemes accepted in `href`, `src` and `action`.
    pub fn allow_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.allowed_schemes.extend(lower_set(schemes));
        self
    }

    /// Remove disallowed elements with their subtree (true) or escape their
    /// tags and keep the content (false).
    pub fn strip_disallowed(mut self, strip: bool) -> Self {
        self.policy.strip_disallowed = strip;
        self
    }

    /// Replace the set of tags whose disallowed elements always lose their
    /// content.
    pub fn clean_content_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.clean_content_tags = lower_set(tags);
        self
    }

    /// Append a transformer to the pipeline.
    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.policy.transformers.push(Arc::new(transformer));
        self
    }

    /// Append an already shared transformer to the pipeline.
    pub fn shared_transformer(mut self, transformer: Arc<dyn Transformer>) -> Self {
        self.policy.transformers.push(transformer);
        self
    }

    /// Turn plain-text URLs into links.
    ///
    /// Only takes effect when `a` is an allowed tag; otherwise the generated
    /// anchors would not survive sanitizing the output again and the URL
    /// text is left as plain text.
    pub fn linkify(mut self, linkify: bool) -> Self {
        self.policy.linkify = linkify;
        self
    }

    /// Set the maximum element nesting depth; 0 means unlimited.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.policy.max_depth = depth;
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the permissive preset: common content tags, link/image/table
/// metadata, `http`/`https`/`mailto` links, escape mode.
pub fn default_policy() -> Policy {
    DEFAULT_POLICY.clone()
}

/// Returns the strict preset: basic inline formatting and lists, no
/// attributes, `https` only, strip mode.
pub fn strict_policy() -> Policy {
    STRICT_POLICY.clone()
}

/// The shared permissive preset used when no policy is supplied.
pub(crate) fn shared_default() -> &'static Policy {
    &DEFAULT_POLICY
}

fn build_permissive() -> Policy {
    let mut builder = PolicyBuilder::new()
        .allow_tags(PERMISSIVE_TAGS)
        .allow_schemes(["http", "https", "mailto"])
        .strip_disallowed(false);
    for (tag, attrs) in PERMISSIVE_ATTRIBUTES {
        builder = builder.allow_attributes(tag, attrs.iter());
    }
    builder.build()
}

fn build_strict() -> Policy {
    PolicyBuilder::new()
        .allow_tags(STRICT_TAGS)
        .allow_schemes(["https"])
        .strip_disallowed(true)
        .build()
}

pub(crate) fn lower_set<I, S>(items: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_ascii_lowercase())
        .collect()
}
