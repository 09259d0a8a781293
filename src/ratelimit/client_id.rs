//! Client identity for rate limiting
//!
//! Proxy headers are checked in a fixed order:
//! - `X-Forwarded-For` (first, i.e. originating, entry)
//! - `X-Real-IP`
//! - `CF-Connecting-IP`
//!
//! Requests carrying none of them share the `anonymous` bucket.

use axum::http::HeaderMap;

pub const ANONYMOUS: &str = "anonymous";

/// Derive the rate-limit key for a request
pub fn client_identity(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or_default();
        return first.trim().to_string();
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip.trim().to_string();
    }

    if let Some(cf_ip) = header_str(headers, "cf-connecting-ip") {
        return cf_ip.trim().to_string();
    }

    ANONYMOUS.to_string()
}

/// Non-empty header value
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_no_headers_is_anonymous() {
        assert_eq!(client_identity(&HeaderMap::new()), ANONYMOUS);
    }

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.1 , 198.51.100.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        assert_eq!(client_identity(&headers), "203.0.113.1");
    }

    #[test]
    fn test_header_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(client_identity(&headers), "198.51.100.7");

        headers.insert("x-real-ip", HeaderValue::from_static(" 10.0.0.1 "));
        assert_eq!(client_identity(&headers), "10.0.0.1");
    }

    #[test]
    fn test_empty_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_identity(&headers), "10.0.0.2");
    }
}
