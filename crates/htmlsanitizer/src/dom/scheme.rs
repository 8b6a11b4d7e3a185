// ABOUTME: URL scheme validation for href, src, and action attribute values.
// ABOUTME: Decodes character references and control characters before checking the scheme.

use tracing::debug;
use url::{ParseError, Url};

use crate::policy::Policy;

/// Attributes whose values are URLs and must pass scheme validation.
pub const URL_ATTRIBUTES: &[&str] = &["href", "src", "action"];

/// Returns true if the attribute carries a URL.
pub fn is_url_attribute(key: &str) -> bool {
    URL_ATTRIBUTES.contains(&key)
}

/// Decides whether a raw URL attribute value is acceptable under the policy.
///
/// Character references are decoded first, so `&#106;avascript:` is seen as
/// `javascript:`. Relative references carry no scheme and are always
/// accepted; anything that fails to parse as a URL is rejected. That
/// includes values whose scheme is allowed but whose authority is not valid,
/// such as `https://` or `https://x.example:99999/`.
pub fn scheme_allowed(raw: &str, policy: &Policy) -> bool {
    let normalized = normalize(raw);

    let allowed = match Url::parse(&normalized) {
        Ok(url) => policy.allows_scheme(url.scheme()),
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    };

    if !allowed {
        debug!(value = %raw, "rejected URL value");
    }
    allowed
}

/// Trim, decode character references, drop control characters, lower-case.
fn normalize(raw: &str) -> String {
    let decoded = htmlize::unescape_attribute(raw.trim());
    decoded
        .chars()
        .filter(|&c| c >= '\u{20}' && c != '\u{7f}')
        .collect::<String>()
        .trim()
        .to_lowercase()
}
