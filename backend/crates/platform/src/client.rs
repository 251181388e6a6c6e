//! Caller identification utilities
//!
//! Resolves the network address a request came from, used as the
//! rate-limit key.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Placeholder caller key when no address can be determined
///
/// A request with no resolvable caller identity still lands in a bucket:
/// every anonymous caller shares this one. Missing identity must never
/// bypass rate limiting.
pub const DEFAULT_CALLER_KEY: &str = "127.0.0.1";

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // First IP in the X-Forwarded-For list is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

/// Resolve the rate-limit key for a request
///
/// The caller's address if one can be determined, otherwise
/// [`DEFAULT_CALLER_KEY`].
pub fn caller_key(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    extract_client_ip(headers, direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| DEFAULT_CALLER_KEY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "203.0.113.7".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_extract_client_ip_garbage_xff_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        let direct: IpAddr = "203.0.113.7".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct)), Some(direct));
    }

    #[test]
    fn test_caller_key_default() {
        let headers = HeaderMap::new();
        assert_eq!(caller_key(&headers, None), DEFAULT_CALLER_KEY);
    }

    #[test]
    fn test_caller_key_from_xff() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(caller_key(&headers, None), "198.51.100.2");
    }
}
