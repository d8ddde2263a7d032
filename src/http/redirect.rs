// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Explicit redirect handling
//!
//! Transport-level redirects are off; this module decides whether a 301/302
//! leads to another hop and what that hop looks like.

use reqwest::StatusCode;

use super::normalize::{domain_of, has_http_scheme};
use super::request::RequestConfig;
use crate::error::{Error, Result};

/// Maximum number of redirects followed in one logical fetch
pub const MAX_REDIRECTS: usize = 10;

/// The next request of a redirect chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    /// Absolute URL to request
    pub url: String,
    /// Config derived for this hop
    pub config: RequestConfig,
    /// Depth of the new hop
    pub depth: usize,
}

/// Only permanent and temporary moves are followed
pub fn is_followed_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND)
}

/// Turn a `Location` header into an absolute URL.
///
/// Absolute http(s) locations are used as-is; anything else is treated as a
/// path on the domain of `current_url`. Empty locations yield `None`.
pub fn resolve_location(location: &str, current_url: &str) -> Option<String> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    if has_http_scheme(location) {
        return Some(location.to_string());
    }

    let domain = domain_of(current_url);
    if location.starts_with('/') {
        Some(format!("{domain}{location}"))
    } else {
        Some(format!("{domain}/{location}"))
    }
}

/// Plan the hop that follows a redirect response.
///
/// `depth` is the depth of the hop that just answered with a redirect.
/// Fails once [`MAX_REDIRECTS`] redirects have already been followed; the
/// error names `origin_url`, the first URL of the chain. Returns `None` when
/// the response carries no usable `Location`.
pub fn next_hop(
    location: Option<&str>,
    current_url: &str,
    config: &RequestConfig,
    origin_url: &str,
    depth: usize,
) -> Result<Option<RedirectHop>> {
    if depth >= MAX_REDIRECTS {
        return Err(Error::too_many_redirects(origin_url, MAX_REDIRECTS));
    }

    let Some(url) = location.and_then(|l| resolve_location(l, current_url)) else {
        tracing::debug!(url = current_url, "Redirect without location, stopping");
        return Ok(None);
    };

    tracing::debug!(from = current_url, to = %url, depth = depth + 1, "Following redirect");
    Ok(Some(RedirectHop {
        url,
        config: config.for_redirect(current_url),
        depth: depth + 1,
    }))
}
