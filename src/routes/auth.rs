// ABOUTME: Account routes: signup, signin, signout, and account deletion
// ABOUTME: Issues JWT session tokens and revokes them on signout
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Account Routes
//!
//! Registration and session management. Credential failures never reveal
//! whether the email or the password was wrong, and the account behind a
//! delete always comes from the verified token rather than the payload.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::constants::{error_messages, limits};
use crate::errors::{AppError, AppResult};
use crate::middleware::auth::{extract_bearer_token, require_user};
use crate::models::User;
use crate::server::ServerResources;

/// Signup request payload.
///
/// Every field is required, but presence is checked by hand so an absent
/// field reports a 400 with a message instead of a bare extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Signin request payload
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Session response returned by signup and signin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub first_name: String,
    pub last_name: String,
}

/// Account and session routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Build the account router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/signup", post(Self::signup))
            .route("/api/auth/signin", post(Self::signin))
            .route("/api/auth/signout", post(Self::signout))
            .route("/api/auth/deleteUser", delete(Self::delete_user))
            .with_state(resources)
    }

    async fn signup(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SignupRequest>,
    ) -> Result<impl IntoResponse, AppError> {
        let (email, first_name, last_name, password) = validate_signup(request)?;

        let password_hash = hash_password(password).await?;
        let user = User::new(email, first_name, last_name, password_hash);

        // The unique index decides conflicts; no read-then-write race
        resources.database.create_user(&user).await?;

        let access_token = resources.auth.generate_user_token(&user)?;
        info!(email = %user.email, "User registered");

        Ok(Json(SessionResponse {
            access_token,
            first_name: user.first_name,
            last_name: user.last_name,
        }))
    }

    async fn signin(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SigninRequest>,
    ) -> Result<impl IntoResponse, AppError> {
        let (email, password) = match (request.email, request.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => return Err(AppError::missing_field("email and password are required")),
        };

        let user = resources
            .database
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        let matches = verify_password(password, user.password_hash.clone()).await?;
        if !matches {
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        let access_token = resources.auth.generate_user_token(&user)?;
        info!(email = %user.email, "User signed in");

        Ok(Json(SessionResponse {
            access_token,
            first_name: user.first_name,
            last_name: user.last_name,
        }))
    }

    async fn signout(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        // The token must still be valid to be signed out
        require_user(&headers, &resources).await?;
        let token = extract_bearer_token(&headers)?;
        resources.auth.revoke_token(token);

        Ok(Json(json!({ "message": "User logged out successfully." })))
    }

    async fn delete_user(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        let (claims, _user) = require_user(&headers, &resources).await?;

        let removed = resources.database.delete_user_by_email(&claims.email).await?;
        if !removed {
            return Err(AppError::not_found("User"));
        }

        // The session is gone along with the account
        let token = extract_bearer_token(&headers)?;
        resources.auth.revoke_token(token);
        info!(email = %claims.email, "User account deleted");

        Ok(Json(json!({ "message": "User deleted successfully." })))
    }
}

fn validate_signup(request: SignupRequest) -> AppResult<(String, String, String, String)> {
    let (Some(email), Some(first_name), Some(last_name), Some(password)) = (
        request.email,
        request.first_name,
        request.last_name,
        request.password,
    ) else {
        return Err(AppError::missing_field(
            "email, firstName, lastName, and password are required",
        ));
    };

    if email.is_empty() || first_name.is_empty() || last_name.is_empty() || password.is_empty() {
        return Err(AppError::missing_field(
            "email, firstName, lastName, and password are required",
        ));
    }

    if !is_valid_email(&email) {
        return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
    }

    if password.len() < limits::MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
    }

    Ok((email, first_name, last_name, password))
}

/// Minimal structural email check: one `@` with a dotted domain after it
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}
