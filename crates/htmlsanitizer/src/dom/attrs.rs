// ABOUTME: Attribute filtering for allowed elements.
// ABOUTME: Keeps allow-listed attributes and drops URL attributes whose scheme is rejected.

use tracing::debug;

use super::scheme::{is_url_attribute, scheme_allowed};
use crate::policy::Policy;
use crate::transform::Attribute;

/// Returns the attributes of a `tag` element that the policy retains, in
/// their original order. A key is kept once, at its first occurrence.
pub fn filter_attributes<'a, I>(tag: &str, attrs: I, policy: &Policy) -> Vec<Attribute>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out: Vec<Attribute> = Vec::new();
    for (key, value) in attrs {
        if !policy.allows_attribute(tag, key) {
            debug!(tag, attr = key, "dropped attribute");
            continue;
        }
        if is_url_attribute(key) && !scheme_allowed(value, policy) {
            continue;
        }
        if out.iter().any(|a| a.key == key) {
            continue;
        }
        out.push(Attribute::new(key, value));
    }
    out
}
