use crate::UrlError;
use url::Url;

/// Normalizes an origin as it appears in the input list into a fetchable root URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `http://` unless the value already starts with `http://` or `https://`
///    (matched in any case; the scheme is lowercased)
/// 3. Strip trailing slashes
/// 4. Verify the result parses as an absolute HTTP(S) URL with a host
///
/// Past the scheme, the returned string keeps the input's spelling (no case
/// folding, no added root slash) so that `{root}/{route}` composes cleanly.
///
/// # Examples
///
/// ```
/// use contact_harvest::url::normalize_origin;
///
/// assert_eq!(normalize_origin("example.com/").unwrap(), "http://example.com");
/// assert_eq!(normalize_origin("https://example.com").unwrap(), "https://example.com");
/// ```
pub fn normalize_origin(origin: &str) -> Result<String, UrlError> {
    let trimmed = origin.trim();

    let with_scheme = match split_http_scheme(trimmed) {
        Some((scheme, rest)) => format!("{}{}", scheme, rest),
        None => format!("http://{}", trimmed),
    };

    let root = with_scheme.trim_end_matches('/').to_string();

    let parsed = Url::parse(&root).map_err(|e| UrlError::Parse(format!("{}: {}", origin, e)))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(root),
        _ => Err(UrlError::MissingDomain),
    }
}

/// Joins a route onto a normalized root URL
///
/// Leading slashes on the route are dropped so `contact` and `/contact`
/// produce the same candidate.
pub fn join_route(root: &str, route: &str) -> String {
    format!("{}/{}", root, route.trim().trim_start_matches('/'))
}

/// Splits off an `http://` or `https://` prefix in any letter case
///
/// The scheme comes back lowercased.
fn split_http_scheme(value: &str) -> Option<(&'static str, &str)> {
    ["http://", "https://"].into_iter().find_map(|scheme| {
        let prefix = value.get(..scheme.len())?;
        prefix
            .eq_ignore_ascii_case(scheme)
            .then(|| (scheme, &value[scheme.len()..]))
    })
}
