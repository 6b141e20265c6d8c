// ABOUTME: JWT authentication and session token management
// ABOUTME: Issues and validates HS256 user and admin tokens, with signout revocation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Authentication Module
//!
//! Stateless JWT session tokens signed with a single HS256 service secret.
//! User tokens carry the account ID, email, and `user` role; the admin console
//! gets a separate `admin` role token. Signout works by recording a digest of
//! the token in an in-memory revocation list until the token would have
//! expired anyway.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Role claim value for regular user sessions
pub const ROLE_USER: &str = "user";
/// Role claim value for admin console sessions
pub const ROLE_ADMIN: &str = "admin";

/// Subject claim used for admin tokens, which have no user account behind them
const ADMIN_SUBJECT: &str = "admin";

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID for user tokens, `admin` for admin tokens
    pub sub: String,
    /// Account email; empty for admin tokens
    pub email: String,
    /// Session role, `user` or `admin`
    pub role: String,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
    /// Audience, always the service name
    pub aud: String,
    /// Unique token ID so same-second issuance never collides
    pub jti: String,
}

impl Claims {
    /// Check whether these claims describe an admin session
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Detailed JWT validation error types for better error handling
#[derive(Debug, thiserror::Error)]
pub enum JwtValidationError {
    /// Token has expired and the client should refresh or re-authenticate
    #[error("Token expired at {expired_at}")]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },

    /// Token signature or claims failed validation
    #[error("Token validation failed: {message}")]
    TokenInvalid {
        /// Why validation failed
        message: String,
    },

    /// Token is structurally malformed
    #[error("Token malformed: {message}")]
    TokenMalformed {
        /// What is wrong with the token structure
        message: String,
    },

    /// Token was revoked by a signout
    #[error("Token has been revoked")]
    TokenRevoked,
}

impl From<JwtValidationError> for AppError {
    fn from(err: JwtValidationError) -> Self {
        match err {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenRevoked => Self::auth_invalid("Token has been revoked"),
            JwtValidationError::TokenInvalid { message } => Self::auth_invalid(message),
            JwtValidationError::TokenMalformed { message } => Self::auth_malformed(message),
        }
    }
}

/// In-memory revocation list for signed-out tokens.
///
/// Keys are SHA-256 digests of the raw token, values are the token's `exp`
/// timestamp so entries can be purged once they would be rejected as expired
/// anyway.
#[derive(Debug, Default)]
pub struct RevokedTokens {
    revoked: DashMap<String, i64>,
}

impl RevokedTokens {
    /// Create an empty revocation list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token as revoked until its expiry timestamp
    pub fn revoke(&self, token: &str, exp: i64) {
        self.revoked.insert(Self::digest(token), exp);
    }

    /// Check whether a token has been revoked, purging expired entries
    #[must_use]
    pub fn is_revoked(&self, token: &str) -> bool {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp > now);
        self.revoked.contains_key(&Self::digest(token))
    }

    fn digest(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

/// Issues and validates session tokens for users and the admin console
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    user_expiry_hours: i64,
    admin_expiry_hours: i64,
    token_counter: AtomicU64,
    revoked: RevokedTokens,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("user_expiry_hours", &self.user_expiry_hours)
            .field("admin_expiry_hours", &self.admin_expiry_hours)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a new manager from the HS256 service secret
    #[must_use]
    pub fn new(secret: &[u8], user_expiry_hours: i64, admin_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            user_expiry_hours,
            admin_expiry_hours,
            token_counter: AtomicU64::new(0),
            revoked: RevokedTokens::new(),
        }
    }

    /// Issue a session token for a registered user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_user_token(&self, user: &User) -> AppResult<String> {
        self.generate_token(
            user.id.to_string(),
            user.email.clone(),
            ROLE_USER,
            self.user_expiry_hours,
        )
    }

    /// Issue an admin console session token
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_admin_token(&self) -> AppResult<String> {
        self.generate_token(
            ADMIN_SUBJECT.into(),
            String::new(),
            ROLE_ADMIN,
            self.admin_expiry_hours,
        )
    }

    fn generate_token(
        &self,
        sub: String,
        email: String,
        role: &str,
        expiry_hours: i64,
    ) -> AppResult<String> {
        let now = Utc::now();
        let count = self.token_counter.fetch_add(1, Ordering::SeqCst);
        let claims = Claims {
            sub,
            email,
            role: role.into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            aud: service_names::HAPPY_MAP.into(),
            jti: format!("{}-{count:08x}", now.timestamp_millis()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims, with detailed failure reasons.
    ///
    /// Revocation is checked before signature validation so a signed-out token
    /// is rejected even while cryptographically valid.
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token_detailed(&self, token: &str) -> Result<Claims, JwtValidationError> {
        if self.revoked.is_revoked(token) {
            debug!("Rejected revoked token");
            return Err(JwtValidationError::TokenRevoked);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[service_names::HAPPY_MAP]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(Self::map_decode_error(token, &e)),
        }
    }

    /// Record a token as revoked for the rest of its lifetime.
    ///
    /// Works on any structurally valid token so signout never fails for a
    /// token the client still holds.
    pub fn revoke_token(&self, token: &str) {
        // Even an unverifiable token gets an entry; fall back to the maximum
        // lifetime we ever issue when the exp claim is unreadable.
        let exp = self
            .validate_token_detailed(token)
            .map_or_else(
                |_| {
                    (Utc::now()
                        + Duration::hours(self.user_expiry_hours.max(self.admin_expiry_hours)))
                    .timestamp()
                },
                |claims| claims.exp,
            );
        self.revoked.revoke(token, exp);
    }

    fn map_decode_error(token: &str, err: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => {
                // Recover the expiry claim for the error detail when possible
                let expired_at = decode_exp_unverified(token)
                    .and_then(|exp| DateTime::from_timestamp(exp, 0))
                    .unwrap_or_else(Utc::now);
                JwtValidationError::TokenExpired { expired_at }
            }
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                JwtValidationError::TokenMalformed {
                    message: err.to_string(),
                }
            }
            _ => JwtValidationError::TokenInvalid {
                message: err.to_string(),
            },
        }
    }
}

/// Extract the `exp` claim without verifying the signature.
///
/// Only used to enrich expiry error messages, never for authorization.
fn decode_exp_unverified(token: &str) -> Option<i64> {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("exp")?.as_i64()
}

/// Bcrypt-hash a password on the blocking thread pool
///
/// # Errors
///
/// Returns an error if the hashing task fails
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a bcrypt hash on the blocking thread pool
///
/// # Errors
///
/// Returns an error if the verification task fails; a wrong password is
/// `Ok(false)`, not an error
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
}

/// Generate a random 512-bit HS256 secret
///
/// # Errors
///
/// Returns an error if the system random number generator fails
pub fn generate_jwt_secret() -> AppResult<[u8; 64]> {
    let mut secret = [0u8; 64];
    rand::rngs::OsRng
        .try_fill_bytes(&mut secret)
        .map_err(|e| AppError::internal(format!("System RNG failure: {e}")))?;
    Ok(secret)
}
