// ABOUTME: Authentication guards called at the top of protected handlers
// ABOUTME: Bearer extraction, role checks, and account resolution
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Authentication Guards
//!
//! Handlers call these helpers directly instead of relying on extractor
//! magic, so each route states exactly what it requires: a valid token, a
//! resolvable user account, or the admin role. Identity always comes from the
//! verified token, never from request payload fields.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::warn;

use crate::auth::Claims;
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::server::ServerResources;

/// Pull the bearer token out of the `Authorization` header
///
/// # Errors
///
/// Returns an authentication-required error when the header is missing or is
/// not a bearer scheme
pub fn extract_bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(AppError::auth_required)
}

/// Validate the request token and return its claims.
///
/// Accepts both user and admin tokens; use [`require_user`] or
/// [`require_admin`] when the role matters.
///
/// # Errors
///
/// Returns an error for missing, malformed, expired, or revoked tokens
pub fn authenticate(headers: &HeaderMap, resources: &Arc<ServerResources>) -> AppResult<Claims> {
    let token = extract_bearer_token(headers)?;
    Ok(resources.auth.validate_token_detailed(token)?)
}

/// Validate a user-role token and resolve the account behind it.
///
/// The account may have been deleted after the token was issued; that case is
/// a permission failure, not a server error.
///
/// # Errors
///
/// Returns an error for invalid tokens, admin tokens, or tokens whose account
/// no longer exists
pub async fn require_user(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<(Claims, User)> {
    let claims = authenticate(headers, resources)?;
    if claims.is_admin() {
        return Err(AppError::permission_denied(
            "This operation requires a user session",
        ));
    }

    let user = resources
        .database
        .get_user_by_email(&claims.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %claims.email, "Token references a deleted account");
            AppError::permission_denied(error_messages::NO_REVIEW_ACCESS)
        })?;

    Ok((claims, user))
}

/// Validate an admin console token
///
/// # Errors
///
/// Returns an error for invalid tokens or tokens without the admin role
pub fn require_admin(headers: &HeaderMap, resources: &Arc<ServerResources>) -> AppResult<Claims> {
    let claims = authenticate(headers, resources)?;
    if !claims.is_admin() {
        return Err(AppError::permission_denied("Admin role required"));
    }
    Ok(claims)
}
