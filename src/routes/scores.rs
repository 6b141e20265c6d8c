// ABOUTME: Happiness score lookup for the map detail panel
// ABOUTME: Returns the precomputed component scores for one ZIP code
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::errors::AppError;
use crate::server::ServerResources;

/// Query parameters for the details lookup
#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub zipcode: String,
}

/// Score lookup routes
pub struct ScoreRoutes;

impl ScoreRoutes {
    /// Build the score router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/details", get(Self::details))
            .with_state(resources)
    }

    async fn details(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<DetailsQuery>,
    ) -> Result<impl IntoResponse, AppError> {
        resources
            .database
            .get_scores(&query.zipcode)
            .await?
            .map(Json)
            .ok_or_else(|| AppError::not_found("Zip code"))
    }
}
