// ABOUTME: JSON policy configuration layered over one of the built-in presets.
// ABOUTME: PolicyConfig deserializes with serde and builds an immutable Policy.

//! Policy configuration files.
//!
//! A configuration names a base preset and overrides any of its fields.
//! Fields that are present replace the preset's value; `transforms` are
//! appended after the preset's own transformers.
//!
//! ```json
//! {
//!   "base": "strict",
//!   "allowed_tags": ["b", "i", "a"],
//!   "allowed_attributes": { "a": ["href"] },
//!   "transforms": [{ "type": "set_attr", "tag": "a", "name": "rel", "value": "nofollow" }]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SanitizeError};
use crate::policy::{default_policy, lower_set, strict_policy, Policy};
use crate::transform::{TransformSpec, Transformer};

/// Preset a configuration starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyBase {
    #[default]
    Default,
    Strict,
}

impl PolicyBase {
    fn policy(self) -> Policy {
        match self {
            PolicyBase::Default => default_policy(),
            PolicyBase::Strict => strict_policy(),
        }
    }
}

/// Serializable description of a [`Policy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub base: PolicyBase,
    #[serde(default)]
    pub allowed_tags: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_attributes: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub allowed_schemes: Option<Vec<String>>,
    #[serde(default)]
    pub strip_disallowed: Option<bool>,
    #[serde(default)]
    pub clean_content_tags: Option<Vec<String>>,
    #[serde(default)]
    pub linkify: Option<bool>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub transforms: Vec<TransformSpec>,
}

impl PolicyConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SanitizeError::config("parse policy config", Some(e.into())))
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            SanitizeError::config(
                format!("read policy config {}", path.display()),
                Some(e.into()),
            )
        })?;
        Self::from_json(&json)
    }

    /// Build the policy described by this configuration.
    pub fn build(self) -> Policy {
        let mut policy = self.base.policy();

        if let Some(tags) = self.allowed_tags {
            policy.allowed_tags = lower_set(tags);
        }
        if let Some(attributes) = self.allowed_attributes {
            policy.allowed_attributes = attributes
                .into_iter()
                .map(|(tag, attrs)| {
                    let attrs: HashSet<String> = attrs.into_iter().collect();
                    (tag.to_ascii_lowercase(), attrs)
                })
                .collect();
        }
        if let Some(schemes) = self.allowed_schemes {
            policy.allowed_schemes = lower_set(schemes);
        }
        if let Some(strip) = self.strip_disallowed {
            policy.strip_disallowed = strip;
        }
        if let Some(tags) = self.clean_content_tags {
            policy.clean_content_tags = lower_set(tags);
        }
        if let Some(linkify) = self.linkify {
            policy.linkify = linkify;
        }
        if let Some(depth) = self.max_depth {
            policy.max_depth = depth;
        }
        policy.transformers.extend(
            self.transforms
                .into_iter()
                .map(|spec| Arc::new(spec) as Arc<dyn Transformer>),
        );
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize;

    #[test]
    fn test_empty_config_is_default_preset() {
        let policy = PolicyConfig::from_json("{}").unwrap().build();
        let preset = default_policy();
        assert_eq!(policy.allowed_tags, preset.allowed_tags);
        assert_eq!(policy.allowed_schemes, preset.allowed_schemes);
        assert!(!policy.strip_disallowed());
    }

    #[test]
    fn test_overrides_replace_base_values() {
        let json = r#"{
            "base": "strict",
            "allowed_tags": ["B", "a"],
            "allowed_attributes": {"A": ["href"]},
            "allowed_schemes": ["HTTP"],
            "linkify": true,
            "max_depth": 3
        }"#;
        let policy = PolicyConfig::from_json(json).unwrap().build();
        assert!(policy.allows_tag("b"));
        assert!(policy.allows_tag("a"));
        assert!(!policy.allows_tag("p"));
        assert!(policy.allows_attribute("a", "href"));
        assert!(policy.allows_scheme("http"));
        assert!(!policy.allows_scheme("https"));
        assert!(policy.strip_disallowed());
        assert!(policy.linkify());
        assert_eq!(policy.max_depth(), 3);
    }

    #[test]
    fn test_transforms_are_applied() {
        let json = r#"{
            "transforms": [
                {"type": "set_attr", "tag": "a", "name": "rel", "value": "nofollow"},
                {"type": "drop", "tag": "img"}
            ]
        }"#;
        let policy = PolicyConfig::from_json(json).unwrap().build();
        let out = sanitize(
            r#"<a href="https://x.com">x</a><img src="https://x.com/a.png">"#,
            &policy,
        )
        .unwrap();
        assert_eq!(out, r#"<a href="https://x.com" rel="nofollow">x</a>"#);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PolicyConfig::from_json(r#"{"allowed_tagz": ["b"]}"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(PolicyConfig::from_json(r#"{"base": "lenient"}"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = PolicyConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(err.is_config());
        assert!(err.op.contains("here.json"));
    }
}
