// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-hop connection setup: proxy selection, timeouts, headers, TLS policy

use std::fmt;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, COOKIE, REFERER, USER_AGENT,
};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Proxy};
use url::Url;

use super::client::FetcherConfig;
use super::cookie::CookieJar;
use super::normalize::is_https;
use super::request::RequestConfig;
use super::DEFAULT_HEADERS;
use crate::error::{Error, Result};

/// Where a hop's TCP connection goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyTarget {
    /// Connect straight to the origin
    Direct,
    /// HTTP proxy
    Http { host: String, port: u16 },
    /// SOCKS5 proxy
    Socks { host: String, port: u16 },
}

impl ProxyTarget {
    /// Resolve a proxy spec (`host`, `host:port`, `host:port:socks`).
    ///
    /// Anything that does not fit the grammar means a direct connection.
    pub fn parse(spec: Option<&str>) -> Self {
        let Some(spec) = spec.map(str::trim).filter(|s| !s.is_empty()) else {
            return ProxyTarget::Direct;
        };

        let parts: Vec<&str> = spec.split(':').collect();
        let host = parts[0].trim();
        if host.is_empty() {
            tracing::warn!(proxy = spec, "Proxy spec has no host, connecting directly");
            return ProxyTarget::Direct;
        }
        let port = |raw: &str| raw.trim().parse::<u16>().ok();

        let target = match parts.as_slice() {
            [_] => Some(ProxyTarget::Http {
                host: host.to_string(),
                port: 80,
            }),
            [_, p] => port(p).map(|port| ProxyTarget::Http {
                host: host.to_string(),
                port,
            }),
            // Third token only marks the proxy as SOCKS; its value is not inspected
            [_, p, _] => port(p).map(|port| ProxyTarget::Socks {
                host: host.to_string(),
                port,
            }),
            _ => None,
        };

        target.unwrap_or_else(|| {
            tracing::warn!(proxy = spec, "Malformed proxy spec, connecting directly");
            ProxyTarget::Direct
        })
    }

    /// Proxy URL understood by reqwest, if any
    pub fn proxy_url(&self) -> Option<String> {
        match self {
            ProxyTarget::Direct => None,
            ProxyTarget::Http { host, port } => Some(format!("http://{host}:{port}")),
            ProxyTarget::Socks { host, port } => Some(format!("socks5h://{host}:{port}")),
        }
    }
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.proxy_url() {
            Some(url) => f.write_str(&url),
            None => f.write_str("direct"),
        }
    }
}

/// Pick the per-call override when set, else the fetcher default
fn effective_timeout(override_ms: u64, default: Duration) -> Duration {
    if override_ms > 0 {
        Duration::from_millis(override_ms)
    } else {
        default
    }
}

/// Assemble request headers for one hop.
///
/// Config headers go first, defaults fill the gaps, referer and user agent
/// always win, and the jar supplies `Cookie` unless the config set one.
pub fn build_headers(url: &str, config: &RequestConfig, jar: &CookieJar) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in &config.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid request header"),
        }
    }

    for (name, value) in DEFAULT_HEADERS.iter() {
        if !headers.contains_key(name) {
            headers.insert(name.clone(), value.clone());
        }
    }

    let overrides = [
        (REFERER, config.referer.as_deref()),
        (USER_AGENT, config.user_agent.as_deref()),
    ];
    for (name, value) in overrides {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            match HeaderValue::try_from(value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(_) => tracing::warn!(header = %name, "Skipping invalid request header"),
            }
        }
    }

    if !headers.contains_key(COOKIE) {
        let cookies = jar.serialize(url);
        if !cookies.is_empty() {
            if let Ok(value) = HeaderValue::try_from(cookies) {
                headers.insert(COOKIE, value);
            }
        }
    }

    headers
}

/// A prepared hop: transport, target URL and headers.
///
/// Dropping it releases the underlying connection pool.
pub struct Connection {
    client: Client,
    url: Url,
    headers: HeaderMap,
    timeout: Duration,
    basic_auth: Option<(String, Option<String>)>,
    target: ProxyTarget,
}

impl Connection {
    /// Prepare a GET for `url` under `config`
    pub fn open(
        url: &str,
        config: &RequestConfig,
        settings: &FetcherConfig,
        jar: &CookieJar,
    ) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| Error::Url {
            url: url.to_string(),
            source,
        })?;

        let target = ProxyTarget::parse(config.proxy.as_deref());
        let connect_timeout = effective_timeout(config.connect_timeout_ms, settings.timeout);
        let read_timeout = effective_timeout(config.read_timeout_ms, settings.timeout);

        let mut builder = Client::builder()
            .redirect(Policy::none())
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .connect_timeout(connect_timeout)
            .danger_accept_invalid_certs(settings.insecure);

        builder = match target.proxy_url().map(|p| Proxy::all(p.as_str())) {
            Some(Ok(proxy)) => builder.proxy(proxy),
            Some(Err(e)) => {
                tracing::warn!(proxy = %target, error = %e, "Unusable proxy, connecting directly");
                builder.no_proxy()
            }
            None => builder.no_proxy(),
        };

        if settings.insecure && is_https(url) {
            tracing::warn!(url, "Certificate and hostname verification disabled");
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let headers = build_headers(url, config, jar);
        let basic_auth = config
            .username
            .as_ref()
            .filter(|u| !u.is_empty() && !headers.contains_key(AUTHORIZATION))
            .map(|u| (u.clone(), config.password.clone()));

        Ok(Self {
            client,
            url: parsed,
            headers,
            timeout: connect_timeout + read_timeout,
            basic_auth,
            target,
        })
    }

    /// Headers that will be sent
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Resolved proxy target
    pub fn target(&self) -> &ProxyTarget {
        &self.target
    }

    /// Send the GET and wait for the response head
    pub async fn send(&self) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .request(Method::GET, self.url.clone())
            .headers(self.headers.clone())
            .timeout(self.timeout);

        if let Some((ref user, ref pass)) = self.basic_auth {
            request = request.basic_auth(user, pass.as_ref());
        }

        request
            .send()
            .await
            .map_err(|e| Error::transport(self.url.as_str(), e))
    }
}
