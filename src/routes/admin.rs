// ABOUTME: Admin console routes: login, data tuning, and scoring triggers
// ABOUTME: Login is rate limited per client IP; everything else needs the admin role
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Admin Routes
//!
//! The admin console authenticates with a single service password and gets a
//! short-lived admin-role token. Attribute and coefficient updates only ever
//! interpolate column names drawn from the compile-time whitelists; the ZIP
//! code, target component, and values are always bound parameters.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::verify_password;
use crate::constants::{regression, zip_attributes};
use crate::errors::AppError;
use crate::middleware::auth::require_admin;
use crate::middleware::client_ip;
use crate::rate_limiting::{rate_limit_headers, RateLimitDecision};
use crate::server::ServerResources;

/// Admin login payload; an absent password reports 400, not an extractor 422
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: Option<String>,
}

/// ZIP-area attribute update payload
#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub zipcode: Option<String>,
    pub attribute: Option<String>,
    pub value: Option<f64>,
}

/// Regression coefficient update payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParametersRequest {
    pub target_component_name: Option<String>,
    pub parameter: Option<String>,
    pub value: Option<f64>,
}

/// Admin console routes
pub struct AdminRoutes;

impl AdminRoutes {
    /// Build the admin router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/adminlogin", post(Self::login))
            .route("/api/updatefield", post(Self::update_field))
            .route("/api/updateParameters", post(Self::update_parameters))
            .route(
                "/api/recalculateHappinessIndex",
                post(Self::recalculate_happiness_index),
            )
            .route("/api/filterOutliers", post(Self::filter_outliers))
            .with_state(resources)
    }

    async fn login(
        headers: HeaderMap,
        connect_info: Option<ConnectInfo<SocketAddr>>,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<AdminLoginRequest>,
    ) -> Result<Response, AppError> {
        // Unresolvable clients share one bucket rather than bypassing the limit
        let ip = client_ip(&headers, connect_info.map(|info| info.0))
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let decision = resources.login_limiter.check(ip);
        if !decision.allowed {
            warn!(%ip, "Admin login rate limit exceeded");
            let error = AppError::rate_limit_exceeded(decision.limit, decision.reset_at)
                .with_details(json!({
                    "message": "Too many login attempts. Please try again later."
                }));
            return Ok(with_rate_limit_headers(error.into_response(), &decision));
        }

        // A malformed attempt still spent one slot in the window
        let Some(password) = request.password else {
            return Ok(with_rate_limit_headers(
                AppError::missing_field("password is required").into_response(),
                &decision,
            ));
        };

        let matches = verify_password(password, resources.admin_password_hash.clone()).await?;
        if !matches {
            warn!(%ip, "Failed admin login attempt");
            return Ok(with_rate_limit_headers(
                AppError::auth_invalid("Unauthorized").into_response(),
                &decision,
            ));
        }

        let token = resources.auth.generate_admin_token()?;
        info!(%ip, "Admin signed in");
        Ok(with_rate_limit_headers(
            Json(json!({ "success": true, "token": token })).into_response(),
            &decision,
        ))
    }

    async fn update_field(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<UpdateFieldRequest>,
    ) -> Result<impl IntoResponse, AppError> {
        require_admin(&headers, &resources)?;

        let Some(zipcode) = request.zipcode.filter(|zipcode| !zipcode.is_empty()) else {
            return Err(AppError::missing_field("zipcode is required"));
        };
        let Some(attribute) = request.attribute else {
            return Err(AppError::missing_field("attribute is required"));
        };
        let Some(value) = request.value else {
            return Err(AppError::missing_field("value is required"));
        };

        let column = zip_attributes::column_for(&attribute)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid attribute: {attribute}")))?;

        let updated = resources
            .database
            .update_zip_attribute(&zipcode, column, value)
            .await?;
        if !updated {
            return Err(AppError::not_found("Zipcode"));
        }

        info!(zipcode = %zipcode, attribute = %attribute, "ZIP attribute updated");
        Ok(Json(json!({ "message": "Field updated successfully." })))
    }

    async fn update_parameters(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<UpdateParametersRequest>,
    ) -> Result<impl IntoResponse, AppError> {
        require_admin(&headers, &resources)?;

        let (Some(target), Some(parameter), Some(value)) = (
            request.target_component_name,
            request.parameter,
            request.value,
        ) else {
            return Err(AppError::missing_field(
                "targetComponentName, parameter, and value are required",
            ));
        };

        if !regression::is_valid_target(&target) {
            return Err(AppError::invalid_input(format!(
                "Invalid targetComponentName: {target}"
            )));
        }

        let column = regression::column_for(&parameter)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid parameter: {parameter}")))?;

        if !value.is_finite() {
            return Err(AppError::invalid_input(
                "Invalid value. A numeric value is required.",
            ));
        }

        let updated = resources
            .database
            .update_regression_parameters(&target, &[(column, value)])
            .await?;
        if !updated {
            return Err(AppError::not_found("Target component"));
        }

        info!(target = %target, parameter = %parameter, "Regression parameter updated");
        Ok(Json(json!({
            "message": format!("Parameter '{parameter}' updated successfully.")
        })))
    }

    async fn recalculate_happiness_index(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        require_admin(&headers, &resources)?;
        resources.database.recalculate_happiness_index().await?;
        Ok(Json(json!({ "message": "Happiness index recalculated." })))
    }

    async fn filter_outliers(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        require_admin(&headers, &resources)?;
        resources.database.filter_outliers().await?;
        Ok(Json(json!({ "message": "Survey outliers filtered." })))
    }
}

fn with_rate_limit_headers(mut response: Response, decision: &RateLimitDecision) -> Response {
    for (name, value) in rate_limit_headers(decision) {
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}
