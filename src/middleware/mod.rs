// ABOUTME: HTTP middleware helpers shared across route handlers
// ABOUTME: Authentication guards and client IP resolution
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Request-level helpers the route handlers call directly rather than tower
//! layers, keeping the authorization decision next to the handler that
//! depends on it.

pub mod auth;

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolve the client IP for rate limiting.
///
/// The service runs behind a reverse proxy in production, so the first
/// `X-Forwarded-For` entry wins; the socket peer address is the fallback for
/// direct connections.
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or_else(|| peer.map(|addr| addr.ip()))
}
