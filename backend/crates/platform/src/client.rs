//! Client identification utilities
//!
//! Resolves the client address for audit logging of authentication events.

use axum::http::HeaderMap;
use std::net::IpAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// First address in `X-Forwarded-For`, else the socket peer.
///
/// An unparsable forwarded value is ignored rather than trusted.
pub fn extract_client_ip(headers: &HeaderMap, peer_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|list| list.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or(peer_ip)
}

/// Format an optional client IP for log fields
pub fn display_ip(ip: Option<IpAddr>) -> String {
    match ip {
        Some(ip) => ip.to_string(),
        None => "unknown".to_string(),
    }
}
