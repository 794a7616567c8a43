//! Header multimap and the boundary sanitizer.

use std::collections::BTreeMap;

/// Header multimap: name to ordered list of values, names kept
/// case-sensitive exactly as received.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Remove header entries whose key is empty.
///
/// Forwarding a malformed header name to the host can crash the
/// host-worker channel, so this is a boundary check: offending entries
/// are dropped silently, never raised as errors.
pub fn sanitize_headers(mut headers: Headers) -> Headers {
    headers.retain(|key, _| {
        if key.is_empty() {
            tracing::warn!("dropped header with empty name");
            return false;
        }
        true
    });
    headers
}
