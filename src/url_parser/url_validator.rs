use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace, warn};
use url::Url;

use super::error::RewriteError;

/// Prefix used to parse scheme-less input. Never emitted.
const SYNTHETIC_SCHEME_PREFIX: &str = "https://";

/// Characters that are invalid in a URL but that callers pass through naively
const DISALLOWED_CHARS: [char; 8] = ['{', '}', '|', '\\', '^', '`', '<', '>'];

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Explicit scheme at the start of the input: a letter, then letters, digits,
/// `+`, `-` or `.`, then `://`.
static SCHEME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*)://").unwrap()
});

/// A candidate URL that passed validation
///
/// Keeps the caller's text verbatim, split into the parts the merger needs.
/// The parsed form is only used for the checks and is not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    pub scheme: Option<String>,   // Explicit scheme from the input, lowercased
    pub host: String,             // Hostname as normalized by the URL parser
    pub base: String,             // Trimmed input before the first '?'
    pub query: String,            // Raw query string, empty if absent
    pub fragment: Option<String>, // Text after the first '#', if any
}

impl ValidatedUrl {
    /// Whether the caller supplied a scheme
    pub fn had_scheme(&self) -> bool {
        self.scheme.is_some()
    }
}

/// Validates a candidate URL
///
/// Accepts both fully qualified URLs and bare domains such as
/// `example.com/path`. Bare input is parsed behind a synthetic `https://`
/// prefix so the hostname can be checked; the prefix does not end up in
/// [`ValidatedUrl::base`].
///
/// # Arguments
/// * `input` - The raw candidate URL
///
/// # Returns
/// * `Result<ValidatedUrl, RewriteError>` - The split URL, or why it was rejected
pub fn validate(input: &str) -> Result<ValidatedUrl, RewriteError> {
    let trimmed = input.trim();
    check_syntax(trimmed)?;

    let scheme = explicit_scheme(trimmed);
    let parse_target = match scheme {
        Some(_) => trimmed.to_string(),
        None => {
            trace!("No explicit scheme, parsing with synthetic prefix");
            format!("{}{}", SYNTHETIC_SCHEME_PREFIX, trimmed)
        }
    };

    let parsed = Url::parse(&parse_target).map_err(|e| {
        warn!("Failed to parse URL '{}': {}", trimmed, e);
        RewriteError::UnparsableUrl(e.to_string())
    })?;

    if let Some(scheme) = &scheme {
        if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
            warn!("Rejecting URL with unsupported scheme: {}", scheme);
            return Err(RewriteError::UnsupportedScheme(scheme.clone()));
        }
    }

    let host = extract_host(&parsed)?;
    let (base, query, fragment) = split_parts(trimmed);
    debug!("Validated URL with host {} (explicit scheme: {})", host, scheme.is_some());

    Ok(ValidatedUrl {
        scheme,
        host,
        base: base.to_string(),
        query: query.to_string(),
        fragment: fragment.map(String::from),
    })
}

/// Rejects empty input, whitespace and characters that are never valid in a URL
fn check_syntax(trimmed: &str) -> Result<(), RewriteError> {
    if trimmed.is_empty() {
        warn!("Received empty URL");
        return Err(RewriteError::MalformedSyntax("URL is empty".to_string()));
    }

    if trimmed.chars().any(char::is_whitespace) {
        warn!("URL contains whitespace: {:?}", trimmed);
        return Err(RewriteError::MalformedSyntax("URL contains whitespace".to_string()));
    }

    if let Some(bad) = trimmed.chars().find(|c| DISALLOWED_CHARS.contains(c)) {
        warn!("URL contains disallowed character {:?}: {}", bad, trimmed);
        return Err(RewriteError::MalformedSyntax(format!(
            "URL contains disallowed character '{}'",
            bad
        )));
    }

    Ok(())
}

/// Returns the lowercased scheme token if the input starts with `scheme://`
fn explicit_scheme(trimmed: &str) -> Option<String> {
    SCHEME_REGEX
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Extracts the hostname, requiring at least one inner dot
fn extract_host(parsed_url: &Url) -> Result<String, RewriteError> {
    let host = match parsed_url.host_str() {
        Some(host) => host,
        None => {
            warn!("URL has no host component");
            return Err(RewriteError::InvalidHostname(String::new()));
        }
    };

    if !host.contains('.') || host.starts_with('.') || host.ends_with('.') {
        warn!("Rejecting hostname without a valid dot: {}", host);
        return Err(RewriteError::InvalidHostname(host.to_string()));
    }

    Ok(host.to_string())
}

/// Splits trimmed input into (base, query, fragment)
fn split_parts(trimmed: &str) -> (&str, &str, Option<&str>) {
    let (before_fragment, fragment) = match trimmed.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (trimmed, None),
    };

    match before_fragment.split_once('?') {
        Some((base, query)) => (base, query, fragment),
        None => (before_fragment, "", fragment),
    }
}
