// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL normalization

use crate::error::{Error, Result};

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Check whether `s` starts with `prefix`, ignoring ASCII case
pub(crate) fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// Check whether a URL string carries an explicit http(s) scheme
pub fn has_http_scheme(url: &str) -> bool {
    starts_with_ignore_case(url, HTTP_PREFIX) || starts_with_ignore_case(url, HTTPS_PREFIX)
}

/// Check whether a URL string targets https
pub fn is_https(url: &str) -> bool {
    starts_with_ignore_case(url, HTTPS_PREFIX)
}

/// Canonicalize a raw URL and fold in an optional query string.
///
/// Missing schemes become `http://`, the fragment is dropped and `param`
/// is appended with `?` or `&` depending on whether a query already exists.
pub fn normalize_url(raw: &str, param: Option<&str>) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument("url can't be empty"));
    }

    let mut url = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{HTTP_PREFIX}{trimmed}")
    };

    if let Some(idx) = url.find('#') {
        url.truncate(idx);
    }

    if let Some(param) = param.filter(|p| !p.trim().is_empty()) {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(param);
    }

    Ok(url)
}

/// Scheme and authority of a URL string, e.g. `https://example.com:8443`.
///
/// Everything up to (not including) the first `/` after the scheme.
pub fn domain_of(url: &str) -> &str {
    let authority_start = url.find("://").map_or(0, |i| i + 3);
    match url[authority_start..].find('/') {
        Some(idx) => &url[..authority_start + idx],
        None => url,
    }
}

/// Host part of a URL string, without scheme, port or path
pub fn host_of(url: &str) -> &str {
    let domain = domain_of(url);
    let authority = domain.find("://").map_or(domain, |i| &domain[i + 3..]);
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    if authority.starts_with('[') {
        // IPv6 literal
        return authority
            .find(']')
            .map_or(authority, |end| &authority[..=end]);
    }
    authority.split(':').next().unwrap_or(authority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_missing_scheme_once() {
        assert_eq!(
            normalize_url("example.com/path", None).unwrap(),
            "http://example.com/path"
        );
        let once = normalize_url("example.com", None).unwrap();
        assert_eq!(normalize_url(&once, None).unwrap(), "http://example.com");
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(
            normalize_url("https://example.com/a", None).unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_url("HTTPS://Example.com/a", None).unwrap(),
            "HTTPS://Example.com/a"
        );
        assert_eq!(
            normalize_url("  http://example.com  ", None).unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_strips_fragment() {
        assert_eq!(
            normalize_url("http://a.com/p#section", None).unwrap(),
            "http://a.com/p"
        );
        assert_eq!(
            normalize_url("http://a.com/p?x=1#frag", Some("y=2")).unwrap(),
            "http://a.com/p?x=1&y=2"
        );
    }

    #[test]
    fn test_appends_params() {
        assert_eq!(
            normalize_url("http://a.com/p?x=1", Some("y=2")).unwrap(),
            "http://a.com/p?x=1&y=2"
        );
        assert_eq!(
            normalize_url("http://a.com/p", Some("y=2")).unwrap(),
            "http://a.com/p?y=2"
        );
        assert_eq!(
            normalize_url("http://a.com/p", Some("   ")).unwrap(),
            "http://a.com/p"
        );
    }

    #[test]
    fn test_rejects_blank_url() {
        assert!(matches!(
            normalize_url("", None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            normalize_url("   \t", Some("a=1")),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://example.com/x/y"), "https://example.com");
        assert_eq!(domain_of("http://example.com:8080"), "http://example.com:8080");
        assert_eq!(domain_of("http://example.com:8080/"), "http://example.com:8080");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://Example.com:8443/x"), "Example.com");
        assert_eq!(host_of("http://user:pw@host.test/"), "host.test");
        assert_eq!(host_of("http://[::1]:8080/"), "[::1]");
    }
}
