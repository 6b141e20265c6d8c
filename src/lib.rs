// ABOUTME: Main library entry point for the happiness index API server
// ABOUTME: Exposes REST endpoints for map scores, surveys, news, and admin tuning
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![deny(unsafe_code)]

//! # Happy Map Server
//!
//! Backend for a public happiness-index map application. Serves precomputed
//! composite happiness scores per ZIP code, accepts user survey submissions,
//! gates community data (comments, crime statistics) behind a review-access
//! flag, and provides an admin console API for tuning regression parameters.
//!
//! Score computation itself lives in database stored procedures
//! (`RecalculateHappinessIndex`, `FilterOutliers`); this service only invokes
//! them and returns their results.
//!
//! ## Architecture
//!
//! - **Routes**: axum handlers grouped per domain under [`routes`]
//! - **Database**: `sqlx` pool with per-domain query modules under [`database`]
//! - **Auth**: HS256 bearer tokens for users and the admin console ([`auth`])
//! - **Rate limiting**: fixed-window per-IP limiter on the admin login route
//!
//! ## Example
//!
//! ```rust,no_run
//! use happy_map_server::config::environment::ServerConfig;
//! use happy_map_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("happy-map-server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication manager for user and admin bearer tokens
pub mod auth;

/// Configuration management from environment variables
pub mod config;

/// Application constants, whitelists, and error message strings
pub mod constants;

/// Database access layer and schema migrations
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for bearer-token authentication
pub mod middleware;

/// Common data models for happiness, survey, and demographic data
pub mod models;

/// Fixed-window rate limiting for the admin login route
pub mod rate_limiting;

/// `HTTP` routes for scores, surveys, news, auth, and admin operations
pub mod routes;

/// Server resources and the HTTP server runner
pub mod server;
