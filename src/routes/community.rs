// ABOUTME: Review-access gated community data: survey comments and crime stats
// ABOUTME: Caller identity comes from the verified token, never a query param
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Community Data Routes
//!
//! Comments and crime statistics are only visible to accounts with the
//! `review_access` flag. Both endpoints resolve the caller from the session
//! token; a token for a deleted account or an account without the flag gets a
//! 403 with a machine-readable `no-access` reason.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::constants::error_messages;
use crate::errors::AppError;
use crate::middleware::auth::require_user;
use crate::server::ServerResources;

/// Query parameters for the gated lookups
#[derive(Debug, Deserialize)]
pub struct CommunityQuery {
    pub zipcode: String,
}

/// Gated community data routes
pub struct CommunityRoutes;

impl CommunityRoutes {
    /// Build the community router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/comments", get(Self::comments))
            .route("/api/crime", get(Self::crime))
            .with_state(resources)
    }

    async fn comments(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<CommunityQuery>,
    ) -> Result<impl IntoResponse, AppError> {
        let (_claims, user) = require_user(&headers, &resources).await?;
        if !user.review_access {
            return Err(no_access_error());
        }

        let comments = resources
            .database
            .comments_for_zipcode(&query.zipcode)
            .await?;
        Ok(Json(comments))
    }

    async fn crime(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<CommunityQuery>,
    ) -> Result<impl IntoResponse, AppError> {
        let (_claims, user) = require_user(&headers, &resources).await?;
        if !user.review_access {
            return Err(no_access_error());
        }

        let stats = resources.database.crime_stats(&query.zipcode).await?;
        Ok(Json(stats))
    }
}

fn no_access_error() -> AppError {
    AppError::permission_denied(error_messages::NO_REVIEW_ACCESS)
        .with_details(json!({ "reason": "no-access" }))
}
