//! Content hashing for HTTP validators using blake3.

/// Strong ETag for `content`: the quoted hex of the first 16 bytes of its
/// blake3 digest. Stable across processes.
pub fn compute_etag(content: impl AsRef<[u8]>) -> String {
    let digest = blake3::hash(content.as_ref());
    format!("\"{}\"", hex::encode(&digest.as_bytes()[..16]))
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Handles `*`, comma-separated lists and weak (`W/`) validators.
pub fn matches_if_none_match(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}
