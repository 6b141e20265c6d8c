// ABOUTME: Local news lookup routes by ZIP code and by city
// ABOUTME: City lookups fan out to every ZIP code belonging to the city
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::constants::error_messages;
use crate::errors::AppError;
use crate::models::is_valid_zipcode;
use crate::server::ServerResources;

/// News lookup routes
pub struct NewsRoutes;

impl NewsRoutes {
    /// Build the news router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/news/city/:city", get(Self::by_city))
            .route("/api/news/:zipcode", get(Self::by_zipcode))
            .with_state(resources)
    }

    async fn by_zipcode(
        State(resources): State<Arc<ServerResources>>,
        Path(zipcode): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        if !is_valid_zipcode(&zipcode) {
            return Err(AppError::invalid_input(error_messages::INVALID_ZIPCODE));
        }

        let articles = resources.database.news_for_zipcode(&zipcode).await?;
        if articles.is_empty() {
            return Err(AppError::not_found("News for this ZIP code"));
        }

        Ok(Json(articles))
    }

    async fn by_city(
        State(resources): State<Arc<ServerResources>>,
        Path(city): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        if city.trim().is_empty() {
            return Err(AppError::missing_field("city is required"));
        }

        let zipcodes = resources.database.zipcodes_for_city(&city).await?;
        if zipcodes.is_empty() {
            return Err(AppError::not_found("ZIP codes for this city"));
        }

        let articles = resources.database.news_for_zipcodes(&zipcodes).await?;
        if articles.is_empty() {
            return Err(AppError::not_found("News for this city"));
        }

        Ok(Json(articles))
    }
}
