// ABOUTME: Configuration module root re-exporting environment-based settings
// ABOUTME: All configuration comes from environment variables, never files
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Configuration management for the happiness index API

/// Environment-based server configuration
pub mod environment;

pub use environment::ServerConfig;
