// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for capture_fetch
//!
//! Every failure of a logical fetch surfaces as one of these variants, so a
//! caller can tell a bad URL from a redirect loop from a network fault.

use thiserror::Error;

/// Result type alias for capture_fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for capture_fetch
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied an unusable argument (e.g. a blank URL)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Redirect chain exceeded the hop limit
    #[error("{url}: more than {limit} redirects")]
    TooManyRedirects { url: String, limit: usize },

    /// DNS, connect, TLS or read failure
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Normalized URL could not be parsed
    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Response body could not be decoded
    #[error("Failed to decode body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a redirect limit error attributed to the chain's first URL
    pub fn too_many_redirects(url: impl Into<String>, limit: usize) -> Self {
        Error::TooManyRedirects {
            url: url.into(),
            limit,
        }
    }

    /// Wrap a reqwest error with the URL of the hop that failed
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Error::Transport {
            url: url.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a transport fault
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { source, .. } if source.is_timeout())
    }

    /// Check if the redirect limit was hit
    pub fn is_too_many_redirects(&self) -> bool {
        matches!(self, Error::TooManyRedirects { .. })
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::TooManyRedirects { url, .. } => Some(url),
            Error::Transport { url, .. } => Some(url),
            Error::Url { url, .. } => Some(url),
            Error::Decode { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_redirects_error() {
        let err = Error::too_many_redirects("http://example.com/start", 10);

        assert!(err.is_too_many_redirects());
        assert!(!err.is_transport());
        assert_eq!(err.url(), Some("http://example.com/start"));
        assert_eq!(
            err.to_string(),
            "http://example.com/start: more than 10 redirects"
        );
    }

    #[test]
    fn test_invalid_argument_has_no_url() {
        let err = Error::invalid_argument("url can't be empty");

        assert!(err.url().is_none());
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "Invalid argument: url can't be empty");
    }

    #[test]
    fn test_decode_error_url() {
        let err = Error::Decode {
            url: "http://example.com/gz".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt"),
        };

        assert_eq!(err.url(), Some("http://example.com/gz"));
    }
}
