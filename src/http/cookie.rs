// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar shared across fetches
//!
//! Cookies are keyed by `domain:name`. Every read and write takes the same
//! lock, and expired cookies are dropped lazily on the next serialization.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::normalize::{host_of, is_https, starts_with_ignore_case};

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to (empty = any domain)
    pub domain: String,
    /// Path attribute, kept but not used for matching
    pub path: Option<String>,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    #[default]
    None,
    Lax,
    Strict,
}

impl Cookie {
    /// Create a new session cookie with no domain
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: None,
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Jar key for this cookie
    pub fn key(&self) -> String {
        format!("{}:{}", self.domain, self.name)
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Check whether the cookie should be sent to `host`.
    ///
    /// Matching is a case-insensitive substring test of the cookie domain
    /// against the target host.
    fn domain_matches(&self, host: &str) -> bool {
        self.domain.is_empty()
            || host
                .to_ascii_lowercase()
                .contains(&self.domain.to_ascii_lowercase())
    }

    /// Parse a Set-Cookie header value.
    ///
    /// Returns `None` when the header carries no `name=value` pair.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let header = if starts_with_ignore_case(header, "set-cookie:") {
            &header["set-cookie:".len()..]
        } else {
            header
        };

        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        let mut max_age = None;

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_ascii_lowercase().as_str() {
                    "domain" => cookie.domain = val.trim_start_matches('.').to_string(),
                    "path" => cookie.path = Some(val.to_string()),
                    "expires" => cookie.expires = parse_cookie_date(val),
                    "max-age" => max_age = val.parse::<i64>().ok(),
                    "samesite" => {
                        cookie.same_site = match val.to_ascii_lowercase().as_str() {
                            "strict" => SameSite::Strict,
                            "lax" => SameSite::Lax,
                            _ => SameSite::None,
                        };
                    }
                    _ => {}
                }
            } else {
                match part.to_ascii_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        // Max-Age wins over Expires
        if let Some(secs) = max_age {
            cookie.expires = Some(expiry_from_max_age(secs));
        }

        Some(cookie)
    }

    /// Convert to cookie header fragment
    pub fn to_header_value(&self) -> String {
        format!("{}={};", self.name, self.value)
    }
}

/// Parse an `Expires` attribute in RFC 1123 or the legacy dashed form
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Turn a `Max-Age` into an absolute expiry, clamping values chrono cannot represent
fn expiry_from_max_age(secs: i64) -> DateTime<Utc> {
    Duration::try_seconds(secs)
        .and_then(|age| Utc::now().checked_add_signed(age))
        .unwrap_or(if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// Thread-safe cookie storage
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<Mutex<HashMap<String, Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cookie by its `domain:name` key
    pub fn add(&self, cookie: Cookie) {
        self.cookies.lock().insert(cookie.key(), cookie);
    }

    /// Record the `Set-Cookie` headers of a response from `url`.
    ///
    /// Cookies without a `Domain` attribute are bound to the host of `url`.
    pub fn ingest<'a, I>(&self, url: &str, headers: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let host = host_of(url);
        let mut cookies = self.cookies.lock();
        for header in headers {
            let Some(mut cookie) = Cookie::parse(header) else {
                tracing::debug!(url, header, "Ignoring unparseable Set-Cookie");
                continue;
            };
            if cookie.domain.is_empty() {
                cookie.domain = host.to_string();
            }
            tracing::debug!(url, key = %cookie.key(), "Storing cookie");
            cookies.insert(cookie.key(), cookie);
        }
    }

    /// Build the `Cookie` header value for a request to `url`.
    ///
    /// Expired cookies are removed from the jar as a side effect. Returns an
    /// empty string when nothing applies.
    pub fn serialize(&self, url: &str) -> String {
        let host = host_of(url);
        let secure_target = is_https(url);
        let mut header = String::new();
        let mut expired = Vec::new();

        let mut cookies = self.cookies.lock();
        for (key, cookie) in cookies.iter() {
            if cookie.is_expired() {
                expired.push(key.clone());
                continue;
            }
            if cookie.secure && !secure_target {
                continue;
            }
            if cookie.domain_matches(host) {
                header.push_str(&cookie.to_header_value());
            }
        }
        for key in expired {
            tracing::debug!(%key, "Pruning expired cookie");
            cookies.remove(&key);
        }

        header
    }

    /// Look up a cookie by domain and name, expired or not
    pub fn get(&self, domain: &str, name: &str) -> Option<Cookie> {
        self.cookies.lock().get(&format!("{domain}:{name}")).cloned()
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.lock().clear();
    }

    /// Get total cookie count, including expired ones not yet pruned
    pub fn len(&self) -> usize {
        self.cookies.lock().len()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let header = "session=abc123; Domain=.example.com; Path=/; Secure; HttpOnly; SameSite=Lax";
        let cookie = Cookie::parse(header).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path.as_deref(), Some("/"));
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::Lax);
        assert!(cookie.expires.is_none());
    }

    #[test]
    fn test_cookie_parsing_rejects_missing_pair() {
        assert!(Cookie::parse("no-equals-sign").is_none());
        assert!(Cookie::parse("=value").is_none());
    }

    #[test]
    fn test_expires_formats() {
        let rfc = Cookie::parse("a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        let legacy = Cookie::parse("a=1; expires=Wed, 21-Oct-2015 07:28:00 GMT").unwrap();

        assert_eq!(rfc.expires, legacy.expires);
        assert!(rfc.is_expired());
    }

    #[test]
    fn test_max_age_overrides_expires() {
        let cookie =
            Cookie::parse("a=1; Max-Age=3600; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert!(!cookie.is_expired());

        let gone = Cookie::parse("a=1; Max-Age=0").unwrap();
        assert!(gone.is_expired());
    }

    #[test]
    fn test_huge_max_age_is_clamped() {
        let jar = CookieJar::new();
        jar.ingest(
            "http://example.com/",
            ["a=1; Max-Age=99999999999999999", "b=2; Max-Age=9000000000000000"],
        );

        let a = jar.get("example.com", "a").unwrap();
        assert_eq!(a.expires, Some(DateTime::<Utc>::MAX_UTC));
        assert!(!a.is_expired());
        assert!(!jar.get("example.com", "b").unwrap().is_expired());

        let header = jar.serialize("http://example.com/");
        assert!(header.contains("a=1;"));
        assert!(header.contains("b=2;"));
    }

    #[test]
    fn test_huge_negative_max_age_expires_cookie() {
        let jar = CookieJar::new();
        jar.ingest(
            "http://example.com/",
            ["a=1; Max-Age=-99999999999999999", "b=2; Max-Age=-9000000000000000"],
        );

        assert!(jar.get("example.com", "a").unwrap().is_expired());
        assert!(jar.get("example.com", "b").unwrap().is_expired());
        assert_eq!(jar.serialize("http://example.com/"), "");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_round_trip_by_domain() {
        let jar = CookieJar::new();
        jar.ingest("https://example.com/x", ["a=1; Domain=example.com"]);

        assert!(jar.serialize("https://example.com/y").contains("a=1;"));
        assert_eq!(jar.serialize("https://other.com"), "");
    }

    #[test]
    fn test_default_domain_from_url() {
        let jar = CookieJar::new();
        jar.ingest("http://shop.test:8080/cart", ["sid=42"]);

        let cookie = jar.get("shop.test", "sid").unwrap();
        assert_eq!(cookie.domain, "shop.test");
        assert_eq!(jar.serialize("http://shop.test/other"), "sid=42;");
        assert_eq!(jar.serialize("http://elsewhere.test/"), "");
    }

    #[test]
    fn test_host_bound_cookie_ignores_scheme_and_port() {
        // Bound to the bare host, so neither scheme nor port separates them
        let jar = CookieJar::new();
        jar.ingest("http://example.com:8080/", ["sid=1"]);

        assert_eq!(jar.serialize("https://example.com/"), "sid=1;");
        assert_eq!(jar.serialize("http://example.com:9090/"), "sid=1;");
        assert_eq!(jar.serialize("https://example.com:8443/login"), "sid=1;");
    }

    #[test]
    fn test_subdomain_match_is_substring() {
        let jar = CookieJar::new();
        jar.ingest("https://example.com", ["a=1; Domain=Example.COM"]);

        assert_eq!(jar.serialize("https://www.example.com/"), "a=1;");
    }

    #[test]
    fn test_secure_cookie_gating() {
        let jar = CookieJar::new();
        jar.ingest("https://example.com/", ["token=t; Secure"]);

        assert_eq!(jar.serialize("https://example.com/"), "token=t;");
        assert_eq!(jar.serialize("http://example.com/"), "");
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let jar = CookieJar::new();
        jar.ingest("http://example.com/", ["a=1"]);
        jar.ingest("http://example.com/", ["a=2"]);

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.serialize("http://example.com/"), "a=2;");
    }

    #[test]
    fn test_expired_cookie_is_pruned() {
        let jar = CookieJar::new();
        jar.add(
            Cookie::new("old", "x")
                .domain("example.com")
                .expires(Utc::now() - Duration::hours(1)),
        );
        jar.add(Cookie::new("fresh", "y").domain("example.com"));
        assert_eq!(jar.len(), 2);

        assert_eq!(jar.serialize("http://example.com/"), "fresh=y;");
        assert_eq!(jar.len(), 1);
        assert!(jar.get("example.com", "old").is_none());
    }

    #[test]
    fn test_domainless_cookie_matches_everything() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("global", "1"));

        assert_eq!(jar.serialize("http://anything.test/"), "global=1;");
    }

    #[test]
    fn test_jar_shared_between_clones() {
        let jar = CookieJar::new();
        let other = jar.clone();
        other.ingest("http://example.com/", ["a=1"]);

        assert_eq!(jar.len(), 1);
        jar.clear();
        assert!(other.is_empty());
    }
}
