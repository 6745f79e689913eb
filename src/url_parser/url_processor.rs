use tracing::{debug, trace};
use url::form_urlencoded;

/// Query keys owned by the rewriter, in the order they are appended
pub const RESERVED_PARAMS: [&str; 3] = ["experiment_name", "variation_name", "visitor_id"];

/// Returns true if `key` is one of the reserved experiment parameters
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PARAMS.contains(&key)
}

/// One `key=value` segment of a query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySegment<'a> {
    pub raw: &'a str, // Segment exactly as the caller wrote it
    pub key: String,  // Decoded key, only used for matching
}

/// Splits a raw query string into its segments
///
/// Order and duplicate keys are preserved and the raw text is never
/// re-encoded, so values that are not valid UTF-8 once decoded survive
/// untouched. Empty segments (`a=1&&b=2`) are skipped.
///
/// # Arguments
/// * `raw_query` - The query string without the leading `?`
///
/// # Returns
/// * `Vec<QuerySegment>` - The segments in original order
pub fn split_query(raw_query: &str) -> Vec<QuerySegment<'_>> {
    let segments: Vec<QuerySegment<'_>> = raw_query
        .split('&')
        .filter(|raw| !raw.is_empty())
        .map(|raw| QuerySegment {
            raw,
            key: decode_key(raw),
        })
        .collect();

    trace!("Split query into {} segments", segments.len());
    segments
}

/// Decodes the key part of a segment (`+` as space, percent-escapes resolved)
fn decode_key(raw: &str) -> String {
    let raw_key = raw.split_once('=').map_or(raw, |(key, _)| key);
    form_urlencoded::parse(raw_key.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

/// Drops every segment whose decoded key is reserved, keeping the rest in order
pub fn strip_reserved(segments: Vec<QuerySegment<'_>>) -> Vec<QuerySegment<'_>> {
    let before = segments.len();
    let kept: Vec<QuerySegment<'_>> = segments
        .into_iter()
        .filter(|segment| !is_reserved(&segment.key))
        .collect();

    if kept.len() != before {
        debug!("Removed {} existing reserved parameters", before - kept.len());
    }
    kept
}
