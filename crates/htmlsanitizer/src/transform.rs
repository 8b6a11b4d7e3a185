// ABOUTME: Transformer pipeline applied to allowed elements after attribute filtering.
// ABOUTME: Defines Element, Attribute, the Transformer trait, and declarative TransformSpec rules.

//! Element transformers.
//!
//! A [`Transformer`] receives an allowed element after its attributes have
//! been filtered and returns either the (possibly modified) element or `None`
//! to remove it together with its whole subtree. Plain closures implement the
//! trait, and [`TransformSpec`] offers the common attribute rewrites as data
//! so they can be loaded from a policy file.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single attribute on an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The view of an allowed element that transformers operate on.
///
/// The tag is lower-cased and read-only; only the attribute list can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<Attribute>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            tag: tag.as_ref().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Create an element from an already filtered attribute list.
    pub(crate) fn with_attrs(tag: &str, attrs: Vec<Attribute>) -> Self {
        Self {
            tag: tag.to_string(),
            attrs,
        }
    }

    /// Builder-style variant of [`Element::set_attr`].
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// The lower-cased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in emission order.
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|a| a.key == key)
    }

    /// Sets the attribute, updating it in place when it already exists and
    /// appending it otherwise.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.key == key) {
            Some(existing) => existing.value = value,
            None => self.attrs.push(Attribute { key, value }),
        }
    }

    /// Removes the named attribute, returning its previous value.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|a| a.key == key)?;
        Some(self.attrs.remove(idx).value)
    }
}

/// A caller-supplied element mutator.
///
/// Returning `None` removes the element and its entire subtree from the
/// output. Transformers run on trusted code paths: attributes they add are
/// emitted without being re-filtered.
pub trait Transformer: Send + Sync {
    fn transform(&self, element: Element) -> Option<Element>;
}

impl<F> Transformer for F
where
    F: Fn(Element) -> Option<Element> + Send + Sync,
{
    fn transform(&self, element: Element) -> Option<Element> {
        self(element)
    }
}

/// Applies the transformers in order, stopping at the first veto.
pub(crate) fn run_pipeline(
    transformers: &[Arc<dyn Transformer>],
    element: Element,
) -> Option<Element> {
    let tag = element.tag.clone();
    let result = transformers
        .iter()
        .try_fold(element, |el, t| t.transform(el));
    if result.is_none() {
        debug!(tag = %tag, "transformer removed element");
    }
    result
}

/// Declarative attribute rewrites, loadable from policy configuration.
///
/// `tag` is optional on every variant; omitting it (or using `"*"`) applies
/// the rule to all allowed elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformSpec {
    /// Set attribute to a fixed value
    SetAttr {
        #[serde(default)]
        tag: Option<String>,
        name: String,
        value: String,
    },
    /// Copy `from` into `to` (overwriting `to`) and remove `from`
    MoveAttr {
        #[serde(default)]
        tag: Option<String>,
        from: String,
        to: String,
    },
    /// Remove an attribute
    RemoveAttr {
        #[serde(default)]
        tag: Option<String>,
        name: String,
    },
    /// Remove the element and its subtree
    Drop {
        #[serde(default)]
        tag: Option<String>,
    },
}

impl TransformSpec {
    fn target(&self) -> Option<&str> {
        match self {
            TransformSpec::SetAttr { tag, .. }
            | TransformSpec::MoveAttr { tag, .. }
            | TransformSpec::RemoveAttr { tag, .. }
            | TransformSpec::Drop { tag } => tag.as_deref(),
        }
    }

    fn applies_to(&self, element: &Element) -> bool {
        match self.target() {
            None | Some("*") => true,
            Some(tag) => tag.eq_ignore_ascii_case(element.tag()),
        }
    }
}

impl Transformer for TransformSpec {
    fn transform(&self, mut element: Element) -> Option<Element> {
        if !self.applies_to(&element) {
            return Some(element);
        }
        match self {
            TransformSpec::SetAttr { name, value, .. } => {
                element.set_attr(name.clone(), value.clone());
            }
            TransformSpec::MoveAttr { from, to, .. } => {
                if let Some(value) = element.remove_attr(from) {
                    element.set_attr(to.clone(), value);
                }
            }
            TransformSpec::RemoveAttr { name, .. } => {
                element.remove_attr(name);
            }
            TransformSpec::Drop { .. } => return None,
        }
        Some(element)
    }
}
