// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # capture_fetch - HTTP content fetcher
//!
//! Fetches a URL with GET and hands back the raw body bytes. Built for
//! resource capture work where requests often go through a debugging proxy.
//!
//! ## Features
//!
//! - URL normalization: missing scheme, fragments, extra query strings
//! - Explicit redirects: 301/302 followed up to 10 hops, with `Referer`
//! - Cookie jar: `Set-Cookie` captured and replayed by domain and `Secure` flag
//! - Proxies: `host`, `host:port` (HTTP) or `host:port:socks` (SOCKS5)
//! - Gzip bodies decoded transparently, error bodies returned on 4xx/5xx
//! - Opt-in insecure mode for intercepting proxies
//!
//! ## Example
//!
//! ```rust,no_run
//! use capture_fetch::{Fetcher, RequestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = Fetcher::new();
//!
//!     let config = RequestConfig::new().param("page=2").proxy("127.0.0.1:8888");
//!     if let Some(body) = fetcher.fetch("example.com/list", Some(&config)).await? {
//!         println!("{} bytes", body.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    Cookie, CookieJar, Fetcher, FetcherConfig, ProxyTarget, RequestConfig, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT, MAX_REDIRECTS,
};

/// capture_fetch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
