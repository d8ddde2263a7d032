// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fetch orchestrator

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::connection::Connection;
use super::cookie::CookieJar;
use super::normalize::normalize_url;
use super::redirect::{is_followed_status, next_hop};
use super::request::RequestConfig;
use super::response::{dump_headers, with_header_dump, HopResponse};
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Connect and read timeout used when a request does not override it
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Fetcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User agent for requests that do not set one
    pub user_agent: String,
    /// Default connect and read timeout
    pub timeout: Duration,
    /// Proxy spec used by the default request config
    pub default_proxy: Option<String>,
    /// Accept any certificate and hostname (dangerous!)
    pub insecure: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_proxy: None,
            insecure: false,
        }
    }
}

impl FetcherConfig {
    /// Create a new fetcher config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the proxy used when no request config is given
    pub fn default_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.default_proxy = Some(proxy.into());
        self
    }

    /// Disable certificate and hostname verification
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

/// HTTP fetcher with a cookie jar shared by all its fetches
#[derive(Clone)]
pub struct Fetcher {
    config: Arc<RwLock<FetcherConfig>>,
    cookie_jar: CookieJar,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Self {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a new fetcher with custom configuration
    pub fn with_config(config: FetcherConfig) -> Self {
        Self::with_jar(config, CookieJar::new())
    }

    /// Create a fetcher that shares an existing cookie jar
    pub fn with_jar(config: FetcherConfig, cookie_jar: CookieJar) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            cookie_jar,
        }
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Snapshot of the fetcher configuration
    pub fn config(&self) -> FetcherConfig {
        self.config.read().clone()
    }

    /// Default connect and read timeout
    pub fn default_timeout(&self) -> Duration {
        self.config.read().timeout
    }

    /// Change the default timeout for subsequent fetches
    pub fn set_default_timeout(&self, timeout: Duration) {
        self.config.write().timeout = timeout;
    }

    /// Request config used when a caller supplies none
    pub fn default_request_config(&self) -> RequestConfig {
        RequestConfig {
            proxy: self.config.read().default_proxy.clone(),
            ..RequestConfig::default()
        }
    }

    /// GET a URL with the default request config
    pub async fn get(&self, url: &str) -> Result<Option<Bytes>> {
        self.fetch(url, None).await
    }

    /// GET a URL with an extra query string
    pub async fn get_with_param(&self, url: &str, param: &str) -> Result<Option<Bytes>> {
        let config = self.default_request_config().param(param);
        self.fetch(url, Some(&config)).await
    }

    /// Perform one logical fetch, following redirects.
    ///
    /// `Ok(None)` means the fetch produced no result: the redirect had no
    /// target, or an error status came back without a body. With
    /// `catch_errors` set on the config, failures are logged and also
    /// reported as `Ok(None)`.
    pub async fn fetch(&self, url: &str, config: Option<&RequestConfig>) -> Result<Option<Bytes>> {
        let settings = self.config();
        let config = config
            .cloned()
            .unwrap_or_else(|| self.default_request_config())
            .with_defaults(&settings.user_agent);
        let catch_errors = config.catch_errors;

        match self.run_chain(url, config, &settings).await {
            Err(e) if catch_errors => {
                tracing::error!(url, error = %e, "Fetch failed");
                Ok(None)
            }
            result => result,
        }
    }

    async fn run_chain(
        &self,
        url: &str,
        mut config: RequestConfig,
        settings: &FetcherConfig,
    ) -> Result<Option<Bytes>> {
        let mut current = normalize_url(url, config.param.as_deref())?;
        let origin = current.clone();
        let mut depth = 0;

        loop {
            let connection = Connection::open(&current, &config, settings, &self.cookie_jar)?;
            tracing::debug!(url = %current, depth, proxy = %connection.target(), "Sending request");

            let response = connection.send().await?;
            let head = HopResponse::from_response(&current, &response);
            tracing::info!(url = %current, status = head.status_code(), depth, "Response received");

            if config.follow_redirects && is_followed_status(head.status) {
                let Some(hop) = next_hop(head.location(), &current, &config, &origin, depth)? else {
                    return Ok(None);
                };
                current = normalize_url(&hop.url, None)?;
                config = hop.config;
                depth = hop.depth;
                continue;
            }

            self.cookie_jar.ingest(&current, head.set_cookies());

            let raw = response
                .bytes()
                .await
                .map_err(|e| Error::transport(current.as_str(), e))?;
            let body = head.decode_body(raw)?;

            if config.show_headers {
                let dump = dump_headers(connection.headers(), &head);
                return Ok(Some(with_header_dump(&dump, body)));
            }
            return Ok(body);
        }
    }
}
