// ABOUTME: Health check endpoint for load balancers and deployment probes
// ABOUTME: Reports service identity, version, and database reachability
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::constants::service_names;
use crate::errors::AppError;
use crate::server::ServerResources;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Build the health router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .route("/ready", get(Self::ready))
            .with_state(resources)
    }

    async fn health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        // A trivial query proves the pool is alive, not just the process
        resources.database.ping().await?;

        Ok(Json(json!({
            "status": "healthy",
            "service": service_names::HAPPY_MAP,
            "version": env!("CARGO_PKG_VERSION"),
        })))
    }

    async fn ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        resources.database.ping().await?;
        Ok(Json(json!({ "ready": true })))
    }
}
