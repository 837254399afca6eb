//! URI checks and escaping for sitemap locations.
//!
//! - Static nodes must carry a well-formed absolute URI
//! - Every `<loc>` is percent-escaped before it is written

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

/// Characters that may not appear literally in a URI.
///
/// Reserved characters and `%` are left to [`escape_uri`] so already-escaped
/// URLs and their query strings pass through unchanged. Non-ASCII is always encoded.
const URI_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-escape a URL string for use in `<loc>`.
///
/// A `%` that does not start a `%XX` triplet is written as `%25`.
pub fn escape_uri(url: &str) -> String {
    utf8_percent_encode(&escape_bare_percent(url), URI_ESCAPE).to_string()
}

fn escape_bare_percent(url: &str) -> Cow<'_, str> {
    let bytes = url.as_bytes();
    let is_bare = |i: usize| bytes[i] == b'%' && !starts_triplet(bytes, i);
    if !(0..bytes.len()).any(is_bare) {
        return Cow::Borrowed(url);
    }

    let mut escaped = String::with_capacity(url.len() + 4);
    for (i, ch) in url.char_indices() {
        if ch == '%' && !starts_triplet(bytes, i) {
            escaped.push_str("%25");
        } else {
            escaped.push(ch);
        }
    }
    Cow::Owned(escaped)
}

fn starts_triplet(bytes: &[u8], i: usize) -> bool {
    matches!(
        bytes.get(i + 1..i + 3),
        Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
    )
}

/// Check that `url` is an absolute URI with a host and no characters that
/// would need escaping.
pub fn is_well_formed_absolute(url: &str) -> bool {
    if url.is_empty() || escape_uri(url) != url {
        return false;
    }
    Url::parse(url).is_ok_and(|parsed| parsed.has_host())
}

/// Set (or replace) a query parameter on `base`.
pub fn with_query_param(base: &Url, key: &str, value: &str) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(key, value);
    }
    url
}
