//! Hyperlink target sanitizing.
//!
//! Every href that can end up in a [`crate::ir::Inline::Link`] passes through
//! [`sanitize_href`]: markdown links found by the inline scanner, anchors in
//! pasted HTML, and links inserted by the editor UI. Only `http`, `https` and
//! `mailto` survive; callers render anything rejected as literal text.
//!
//! # Rules
//!
//! 1. Trim surrounding whitespace.
//! 2. Reject empty values and any control character.
//! 3. Require a `scheme:` prefix (relative paths are rejected, not resolved).
//! 4. Parse with the `url` crate; reject on failure.
//! 5. Accept `http`/`https` with a non-empty host, and `mailto`.
//!
//! The accepted value is returned as written (trimmed), not in the URL
//! crate's normalized form, so round-trips do not rewrite user links.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is valid"));

/// Schemes a hyperlink may use.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Returns the trimmed href when its scheme is allow-listed, `None` otherwise.
///
/// # Example
///
/// ```
/// use notemark_babel::common::links::sanitize_href;
///
/// assert_eq!(sanitize_href(" https://example.com "), Some("https://example.com".to_string()));
/// assert_eq!(sanitize_href("javascript:alert(1)"), None);
/// ```
pub fn sanitize_href(raw: &str) -> Option<String> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return None;
    }
    if candidate.chars().any(char::is_control) {
        debug!("rejected href containing control characters");
        return None;
    }
    if !SCHEME_PREFIX.is_match(candidate) {
        debug!(href = candidate, "rejected href without scheme");
        return None;
    }

    let url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(err) => {
            debug!(href = candidate, %err, "rejected unparseable href");
            return None;
        }
    };

    let accepted = match url.scheme() {
        "http" | "https" => url.host_str().is_some_and(|host| !host.is_empty()),
        "mailto" => true,
        _ => false,
    };

    if accepted {
        Some(candidate.to_string())
    } else {
        debug!(href = candidate, scheme = url.scheme(), "rejected href scheme");
        None
    }
}
