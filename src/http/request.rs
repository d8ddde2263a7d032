// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-request configuration

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Encoding assumed when a config leaves it blank
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Options for one logical fetch.
///
/// Values are copied, never shared: each redirect hop works on its own
/// derived copy (see [`RequestConfig::for_redirect`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Request method. Only GET is ever sent.
    pub method: String,
    /// Query string appended to the URL
    pub param: Option<String>,
    /// Character encoding hint for the caller
    pub encoding: String,
    /// Referer header
    pub referer: Option<String>,
    /// Connect timeout in milliseconds (0 = fetcher default)
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds (0 = fetcher default)
    pub read_timeout_ms: u64,
    /// Prefix the body with a dump of request and response headers
    pub show_headers: bool,
    /// Basic auth user name
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Proxy spec: `host`, `host:port` or `host:port:socks`
    pub proxy: Option<String>,
    /// User-Agent override
    pub user_agent: Option<String>,
    /// Follow 301/302 responses
    pub follow_redirects: bool,
    /// Extra request headers
    pub headers: HashMap<String, String>,
    /// Log failures and return no result instead of an error
    pub catch_errors: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            param: None,
            encoding: DEFAULT_ENCODING.to_string(),
            referer: None,
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            show_headers: false,
            username: None,
            password: None,
            proxy: None,
            user_agent: None,
            follow_redirects: true,
            headers: HashMap::new(),
            catch_errors: false,
        }
    }
}

impl RequestConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query string
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Set the referer
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Set the encoding hint
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Include a header dump in the returned bytes
    pub fn show_headers(mut self, show: bool) -> Self {
        self.show_headers = show;
        self
    }

    /// Set basic auth credentials
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set proxy spec
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Swallow failures into an empty result
    pub fn catch_errors(mut self, catch: bool) -> Self {
        self.catch_errors = catch;
        self
    }

    /// Copy used for the hop after a redirect from `completed_url`.
    ///
    /// The query string is cleared because it is already part of the URL
    /// that produced the redirect.
    pub fn for_redirect(&self, completed_url: &str) -> Self {
        Self {
            method: "GET".to_string(),
            param: None,
            referer: Some(completed_url.to_string()),
            ..self.clone()
        }
    }

    /// Fill blank encoding and user agent
    pub(crate) fn with_defaults(mut self, default_user_agent: &str) -> Self {
        if self.encoding.trim().is_empty() {
            self.encoding = DEFAULT_ENCODING.to_string();
        }
        if self.user_agent.as_deref().map_or(true, |ua| ua.trim().is_empty()) {
            self.user_agent = Some(default_user_agent.to_string());
        }
        self
    }

    /// Check whether the config sets a header, ignoring case
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }
}
