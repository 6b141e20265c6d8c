// ABOUTME: Root API endpoints: welcome message and the map overlay document
// ABOUTME: The GeoJSON overlay is loaded once at startup and served verbatim
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::errors::AppError;
use crate::server::ServerResources;

/// Welcome and overlay routes
pub struct ApiRoutes;

impl ApiRoutes {
    /// Build the root API router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api", get(Self::hello))
            .route("/api/geojson", get(Self::geojson))
            .with_state(resources)
    }

    async fn hello() -> impl IntoResponse {
        Json(json!({ "message": "Hello from server!" }))
    }

    async fn geojson(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<impl IntoResponse, AppError> {
        resources
            .geojson
            .as_ref()
            .map(|document| Json(document.clone()))
            .ok_or_else(|| AppError::not_found("ZIP-area overlay"))
    }
}
