pub mod health;
pub mod health_declarations;

use std::net::IpAddr;
use std::time::Instant;

use axum::http::HeaderMap;

use crate::config::ServerConfig;

/// Process-wide values shared with the handlers through an `Extension`.
#[derive(Debug)]
pub struct ApiContext {
    pub config: ServerConfig,
    pub started_at: Instant,
}

impl ApiContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            started_at: Instant::now(),
        }
    }
}

/// Client address as reported by a fronting proxy, if any.
///
/// Only values that parse as an IP address are accepted.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .and_then(parse_ip)
        .or_else(|| header("x-real-ip").and_then(parse_ip))
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_ip(&headers), Some([203, 0, 113, 7].into()));
    }

    #[test]
    fn falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_ip(&headers), Some([10, 0, 0, 2].into()));
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn ignores_values_that_are_not_addresses() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));
        assert_eq!(forwarded_ip(&headers), Some("2001:db8::1".parse().unwrap()));

        headers.insert("x-real-ip", HeaderValue::from_str(&"9".repeat(60)).unwrap());
        assert_eq!(forwarded_ip(&headers), None);
    }
}
