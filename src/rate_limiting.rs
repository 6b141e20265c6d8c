// ABOUTME: Fixed-window rate limiting for the admin login route
// ABOUTME: Tracks per-IP attempt counts and produces X-RateLimit response headers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Rate Limiting Module
//!
//! Per-client-IP fixed-window rate limiting for admin login attempts. Every
//! attempt counts against the window, successful or not, so a stolen password
//! cannot be confirmed by interleaving guesses with known-good logins.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::config::environment::RateLimitConfig;

/// Outcome of a rate limit check, with enough detail for response headers
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitDecision {
    /// Whether this attempt is allowed through
    pub allowed: bool,
    /// Window capacity
    pub limit: u32,
    /// Attempts left in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    attempts: u32,
}

/// Fixed-window per-IP limiter for admin login attempts
#[derive(Debug)]
pub struct LoginRateLimiter {
    windows: DashMap<IpAddr, Window>,
    max_attempts: u32,
    window: Duration,
}

impl LoginRateLimiter {
    /// Create a limiter from configuration
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            max_attempts: config.max_attempts,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Record one attempt from `ip` and decide whether it may proceed.
    ///
    /// The attempt is counted before the credential check runs, so rejected
    /// and accepted logins consume the window equally.
    pub fn check(&self, ip: IpAddr) -> RateLimitDecision {
        let now = Instant::now();
        let mut entry = self.windows.entry(ip).or_insert_with(|| Window {
            started: now,
            attempts: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.attempts = 0;
        }

        entry.attempts += 1;
        let allowed = entry.attempts <= self.max_attempts;
        let remaining = self.max_attempts.saturating_sub(entry.attempts);
        let elapsed = now.duration_since(entry.started);
        let reset_in = self.window.saturating_sub(elapsed);
        drop(entry);

        // Periodic cleanup keeps the map from growing unbounded under scans
        if self.windows.len() > 1024 {
            self.purge_expired(now);
        }

        RateLimitDecision {
            allowed,
            limit: self.max_attempts,
            remaining,
            reset_at: Utc::now()
                + chrono::Duration::from_std(reset_in).unwrap_or_else(|_| chrono::Duration::zero()),
        }
    }

    fn purge_expired(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }
}

impl RateLimitDecision {
    /// Seconds until the current window resets, floored at zero
    #[must_use]
    pub fn retry_after_secs(&self) -> i64 {
        (self.reset_at - Utc::now()).num_seconds().max(0)
    }
}

/// Standard rate limit headers for an HTTP response
#[must_use]
pub fn rate_limit_headers(decision: &RateLimitDecision) -> [(&'static str, String); 4] {
    [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_at.timestamp().to_string()),
        ("retry-after", decision.retry_after_secs().to_string()),
    ]
}
