// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP fetch pipeline
//!
//! URL normalization, cookie jar, per-hop connection setup, explicit
//! redirect handling and the fetch orchestrator that ties them together.

mod client;
mod connection;
mod cookie;
mod normalize;
mod redirect;
mod request;
mod response;

use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, CACHE_CONTROL, USER_AGENT};

pub use client::{Fetcher, FetcherConfig, DEFAULT_TIMEOUT};
pub use connection::{build_headers, Connection, ProxyTarget};
pub use cookie::{Cookie, CookieJar, SameSite};
pub use normalize::{domain_of, has_http_scheme, host_of, is_https, normalize_url};
pub use redirect::{is_followed_status, next_hop, resolve_location, RedirectHop, MAX_REDIRECTS};
pub use request::{RequestConfig, DEFAULT_ENCODING};
pub use response::{dump_headers, HopResponse};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("capture_fetch/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    /// Headers sent on every hop unless the request config overrides them
    pub static ref DEFAULT_HEADERS: HeaderMap = {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers
    };
}
