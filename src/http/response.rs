// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response head inspection and body decoding

use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};
use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, CONTENT_ENCODING, LOCATION, SET_COOKIE};
use reqwest::{StatusCode, Version};

use crate::error::{Error, Result};

/// Status line and headers of one hop's response
#[derive(Debug, Clone)]
pub struct HopResponse {
    /// URL the hop requested
    pub url: String,
    /// Response status code
    pub status: StatusCode,
    /// HTTP version
    pub version: Version,
    /// Response headers
    pub headers: HeaderMap,
}

impl HopResponse {
    /// Capture the head of a reqwest response
    pub fn from_response(url: &str, response: &reqwest::Response) -> Self {
        Self::new(
            url,
            response.status(),
            response.version(),
            response.headers().clone(),
        )
    }

    /// Create a response head
    pub fn new(url: &str, status: StatusCode, version: Version, headers: HeaderMap) -> Self {
        Self {
            url: url.to_string(),
            status,
            version,
            headers,
        }
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Location` header, if it is valid text
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Check whether the body is gzip encoded
    pub fn is_gzip(&self) -> bool {
        self.headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |enc| enc.trim().eq_ignore_ascii_case("gzip"))
    }

    /// Turn the raw body into the fetch result.
    ///
    /// Error statuses with an empty body give `None`; gzip bodies are inflated.
    pub fn decode_body(&self, raw: Bytes) -> Result<Option<Bytes>> {
        if self.status.as_u16() > 399 && raw.is_empty() {
            return Ok(None);
        }
        if !self.is_gzip() || raw.is_empty() {
            return Ok(Some(raw));
        }

        let mut decoded = Vec::with_capacity(raw.len() * 4);
        GzDecoder::new(&raw[..])
            .read_to_end(&mut decoded)
            .map_err(|source| Error::Decode {
                url: self.url.clone(),
                source,
            })?;
        tracing::debug!(
            url = %self.url,
            compressed = raw.len(),
            inflated = decoded.len(),
            "Decoded gzip body"
        );

        Ok(Some(Bytes::from(decoded)))
    }
}

/// Render request and response headers as a text block.
///
/// Each header is a `  name=value\r\n` line; each block ends with `\r\n`.
pub fn dump_headers(request: &HeaderMap, response: &HopResponse) -> String {
    let mut out = String::new();

    append_block(&mut out, None, request);
    let status_line = format!(
        "{:?} {} {}",
        response.version,
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("")
    );
    append_block(&mut out, Some(status_line.trim_end()), &response.headers);

    out
}

fn append_block(out: &mut String, first_line: Option<&str>, headers: &HeaderMap) {
    if let Some(line) = first_line {
        out.push_str("  ");
        out.push_str(line);
        out.push_str("\r\n");
    }
    for (name, value) in headers {
        out.push_str("  ");
        out.push_str(name.as_str());
        out.push('=');
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
}

/// Prefix a body with a header dump
pub fn with_header_dump(dump: &str, body: Option<Bytes>) -> Bytes {
    let body = body.unwrap_or_default();
    let mut out = BytesMut::with_capacity(dump.len() + body.len());
    out.put_slice(dump.as_bytes());
    out.put_slice(&body);
    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use reqwest::header::HeaderValue;
    use std::io::Write;

    fn head(status: u16, headers: &[(&'static str, &'static str)]) -> HopResponse {
        let mut map = HeaderMap::new();
        for &(name, value) in headers {
            map.append(name, HeaderValue::from_static(value));
        }
        HopResponse::new(
            "http://example.com/",
            StatusCode::from_u16(status).unwrap(),
            Version::HTTP_11,
            map,
        )
    }

    fn gzip(data: &[u8]) -> Bytes {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        Bytes::from(encoder.finish().unwrap())
    }

    #[test]
    fn test_gzip_body_is_inflated() {
        let payload = b"<html>hello hello hello</html>".repeat(20);
        let resp = head(200, &[("content-encoding", "gzip")]);

        let body = resp.decode_body(gzip(&payload)).unwrap().unwrap();
        assert_eq!(&body[..], &payload[..]);
    }

    #[test]
    fn test_plain_body_passes_through() {
        let resp = head(200, &[]);
        let body = resp.decode_body(Bytes::from_static(b"plain")).unwrap();
        assert_eq!(body, Some(Bytes::from_static(b"plain")));
    }

    #[test]
    fn test_corrupt_gzip_is_decode_error() {
        let resp = head(200, &[("content-encoding", "gzip")]);
        let err = resp
            .decode_body(Bytes::from_static(b"definitely not gzip"))
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_error_status_bodies() {
        let empty = head(404, &[]).decode_body(Bytes::new()).unwrap();
        assert!(empty.is_none());

        let diagnostic = head(500, &[]).decode_body(Bytes::from_static(b"trace")).unwrap();
        assert_eq!(diagnostic, Some(Bytes::from_static(b"trace")));

        let empty_ok = head(200, &[]).decode_body(Bytes::new()).unwrap();
        assert_eq!(empty_ok, Some(Bytes::new()));
    }

    #[test]
    fn test_set_cookies_and_location() {
        let resp = head(
            302,
            &[
                ("set-cookie", "a=1"),
                ("set-cookie", "b=2; Secure"),
                ("location", "/next"),
            ],
        );
        assert_eq!(resp.set_cookies(), vec!["a=1", "b=2; Secure"]);
        assert_eq!(resp.location(), Some("/next"));
    }

    #[test]
    fn test_dump_headers() {
        let mut request = HeaderMap::new();
        request.insert("user-agent", HeaderValue::from_static("ua"));
        let resp = head(200, &[("content-type", "text/plain")]);

        let dump = dump_headers(&request, &resp);
        assert_eq!(
            dump,
            "  user-agent=ua\r\n\r\n  HTTP/1.1 200 OK\r\n  content-type=text/plain\r\n\r\n"
        );

        let out = with_header_dump(&dump, Some(Bytes::from_static(b"body")));
        assert!(out.ends_with(b"\r\n\r\nbody"));
    }
}
