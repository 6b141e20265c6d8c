// ABOUTME: Happiness survey submission route
// ABOUTME: Authenticated users rate a ZIP code with an optional comment
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::constants::error_messages;
use crate::errors::AppError;
use crate::middleware::auth::require_user;
use crate::models::{is_valid_zipcode, NewSurvey};
use crate::server::ServerResources;

/// Survey submission payload.
///
/// `useremail` is cross-checked against the token identity; the token wins
/// and a mismatch is rejected outright. The required fields are `Option` so
/// an absent field reports a 400 rather than a bare extractor rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitSurveyRequest {
    pub useremail: Option<String>,
    pub zipcode: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Survey routes
pub struct SurveyRoutes;

impl SurveyRoutes {
    /// Build the survey router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/submitSurvey", post(Self::submit))
            .with_state(resources)
    }

    async fn submit(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SubmitSurveyRequest>,
    ) -> Result<impl IntoResponse, AppError> {
        let (claims, _user) = require_user(&headers, &resources).await?;

        let Some(useremail) = request.useremail else {
            return Err(AppError::missing_field("useremail is required"));
        };
        if useremail != claims.email {
            return Err(AppError::permission_denied("Unauthorized access"));
        }

        let Some(zipcode) = request.zipcode else {
            return Err(AppError::missing_field("zipcode is required"));
        };
        if !is_valid_zipcode(&zipcode) {
            return Err(AppError::invalid_input(error_messages::INVALID_ZIPCODE));
        }

        let Some(rating) = request.rating else {
            return Err(AppError::missing_field("rating is required"));
        };

        let survey = NewSurvey {
            user_email: claims.email.clone(),
            zipcode,
            rating,
            comment: request
                .comment
                .filter(|comment| !comment.trim().is_empty()),
        };

        if !survey.rating_in_range() {
            return Err(AppError::value_out_of_range(
                "rating must be between 1 and 10",
            ));
        }

        resources.database.insert_survey(&survey).await?;
        info!(email = %claims.email, zipcode = %survey.zipcode, "Survey submitted");

        Ok(Json(json!({ "message": "Survey submitted successfully" })))
    }
}
