// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Environment-based configuration management for production deployment

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tracing::warn;

/// Default admin password used when `ADMIN_PASSWORD` is unset.
///
/// Only acceptable for local development; `from_env` logs a warning whenever
/// this fallback is active.
const DEFAULT_ADMIN_PASSWORD: &str = "securepassword123";

/// Strongly typed log level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// PostgreSQL connection
    PostgreSQL { connection_string: String },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Self::Memory
            } else {
                Self::SQLite {
                    path: PathBuf::from(path_str),
                }
            }
        } else if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            Self::PostgreSQL {
                connection_string: s.into(),
            }
        } else {
            // Fallback: treat as SQLite file path
            Self::SQLite {
                path: PathBuf::from(s),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::PostgreSQL { connection_string } => connection_string.clone(),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/happy_map.db"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret; generated when the env var is absent
    pub jwt_secret: Vec<u8>,
    /// User session token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Admin console token lifetime in hours
    pub admin_token_expiry_hours: i64,
    /// Admin console password, bcrypt-hashed at startup
    pub admin_password: String,
}

/// Rate limiting configuration for the admin login route
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Attempts allowed per window, per client IP
    pub max_attempts: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: limits::ADMIN_LOGIN_MAX_ATTEMPTS,
            window_secs: limits::ADMIN_LOGIN_WINDOW_SECS,
        }
    }
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address
    pub http_host: IpAddr,
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Admin login rate limiting settings
    pub rate_limit: RateLimitConfig,
    /// Path to the ZIP-area overlay GeoJSON document
    pub geojson_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric environment variable fails to parse or
    /// the system RNG fails while generating a fallback JWT secret.
    pub fn from_env() -> AppResult<Self> {
        let http_host = parse_env_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let http_port = parse_env_or("HTTP_PORT", 8080)?;

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        );

        let log_level = LogLevel::from_str_or_default(
            &env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        );

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_or_else(|_| DatabaseUrl::default(), |s| DatabaseUrl::parse_url(&s)),
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret.into_bytes(),
            Err(_) => {
                warn!("JWT_SECRET not set; generating an ephemeral secret (tokens will not survive restarts)");
                crate::auth::generate_jwt_secret()?.to_vec()
            }
        };

        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            warn!("ADMIN_PASSWORD not set; using the development default password");
            DEFAULT_ADMIN_PASSWORD.into()
        });

        let auth = AuthConfig {
            jwt_secret,
            jwt_expiry_hours: parse_env_or("JWT_EXPIRY_HOURS", limits::USER_TOKEN_EXPIRY_HOURS)?,
            admin_token_expiry_hours: parse_env_or(
                "ADMIN_TOKEN_EXPIRY_HOURS",
                limits::ADMIN_TOKEN_EXPIRY_HOURS,
            )?,
            admin_password,
        };

        let rate_limit = RateLimitConfig {
            max_attempts: parse_env_or("ADMIN_LOGIN_MAX_ATTEMPTS", limits::ADMIN_LOGIN_MAX_ATTEMPTS)?,
            window_secs: parse_env_or("ADMIN_LOGIN_WINDOW_SECS", limits::ADMIN_LOGIN_WINDOW_SECS)?,
        };

        let geojson_path = env::var("GEOJSON_PATH").ok().map(PathBuf::from);

        Ok(Self {
            http_host,
            http_port,
            environment,
            log_level,
            database,
            auth,
            rate_limit,
            geojson_path,
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} listen={}:{} database={} log_level={} admin_login_limit={}/{}s",
            self.environment,
            self.http_host,
            self.http_port,
            self.database.url.to_connection_string(),
            self.log_level,
            self.rate_limit.max_attempts,
            self.rate_limit.window_secs,
        )
    }
}

/// Parse an environment variable with a typed default
fn parse_env_or<T>(name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite:./data/app.db"),
            DatabaseUrl::SQLite { .. }
        ));
        assert!(matches!(
            DatabaseUrl::parse_url("postgresql://localhost/happy"),
            DatabaseUrl::PostgreSQL { .. }
        ));
        // Bare paths fall back to SQLite
        assert!(matches!(
            DatabaseUrl::parse_url("./some/file.db"),
            DatabaseUrl::SQLite { .. }
        ));
    }

    #[test]
    fn test_environment_parsing() {
        assert!(Environment::from_str_or_default("prod").is_production());
        assert!(!Environment::from_str_or_default("dev").is_production());
        assert_eq!(
            Environment::from_str_or_default("nonsense"),
            Environment::Development
        );
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }
}
