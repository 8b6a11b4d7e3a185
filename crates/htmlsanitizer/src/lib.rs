// ABOUTME: Main library entry point for the policy-driven HTML sanitizer.
// ABOUTME: Re-exports the public API: sanitize, strip_tags, Policy, PolicyBuilder, presets, transformers.

//! htmlsanitizer - rewrites untrusted HTML so that only the tags,
//! attributes and URL schemes allowed by a [`Policy`] survive.
//!
//! Input is parsed with `scraper` (html5ever); the sanitizer walks the
//! resulting tree and serializes a fresh string. Disallowed elements are
//! either removed with their content (strip mode) or rendered as inert,
//! escaped text while their children are still processed (escape mode).
//! `script` and `style` content is dropped in both modes unless the policy
//! says otherwise.
//!
//! # Example
//!
//! ```
//! use htmlsanitizer::{default_policy, sanitize, strict_policy, Element};
//!
//! let clean = sanitize(r#"<a href="javascript:alert(1)" onclick="x()">hi</a>"#, &default_policy())?;
//! assert_eq!(clean, "<a>hi</a>");
//!
//! let policy = strict_policy()
//!     .to_builder()
//!     .allow_tags(["a"])
//!     .allow_attributes("a", ["href"])
//!     .transformer(|mut el: Element| {
//!         if el.tag() == "a" {
//!             el.set_attr("rel", "nofollow");
//!         }
//!         Some(el)
//!     })
//!     .build();
//! let clean = sanitize(r#"<a href="https://example.com">x</a><div>gone</div>"#, &policy)?;
//! assert_eq!(clean, r#"<a href="https://example.com" rel="nofollow">x</a>"#);
//! # Ok::<(), htmlsanitizer::SanitizeError>(())
//! ```
//!
//! Policies are immutable and `Send + Sync`; share one across threads
//! freely.

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod linkify;
pub mod policy;
pub mod text;
pub mod transform;

pub use crate::config::{PolicyBase, PolicyConfig};
pub use crate::engine::{sanitize, sanitize_document, sanitize_reader};
pub use crate::error::{ErrorCode, Result, SanitizeError};
pub use crate::policy::{default_policy, strict_policy, Policy, PolicyBuilder, ANY_TAG};
pub use crate::text::{strip_tags, strip_tags_reader};
pub use crate::transform::{Attribute, Element, TransformSpec, Transformer};
