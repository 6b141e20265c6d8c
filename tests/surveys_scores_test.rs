// ABOUTME: Integration tests for score lookups and survey submission
// ABOUTME: Covers the details endpoint and survey validation rules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use http::StatusCode;
use serde_json::json;

async fn seed_scores(resources: &std::sync::Arc<happy_map_server::server::ServerResources>) {
    let scores = happy_map_server::models::ComponentScores {
        total_happiness_score: 7.2,
        economic_wellbeing_score: 6.1,
        family_and_relationships_score: 8.0,
        physical_and_mental_wellbeing_score: 7.5,
        environmental_and_societal_wellness_score: 6.9,
    };
    resources
        .database
        .upsert_scores("60601", &scores)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_details_returns_component_scores() {
    let resources = common::test_resources().await;
    seed_scores(&resources).await;

    let (status, body) =
        common::send(&resources, "GET", "/api/details?zipcode=60601", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalHappinessScore"], 7.2);
    assert_eq!(body["economicWellbeingScore"], 6.1);
    assert_eq!(body["environmentalAndSocietalWellnessScore"], 6.9);
}

#[tokio::test]
async fn test_details_unknown_zipcode_is_404() {
    let resources = common::test_resources().await;
    let (status, _) =
        common::send(&resources, "GET", "/api/details?zipcode=99999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_survey_submission_happy_path() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    let (status, body) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        Some(&token),
        Some(json!({
            "useremail": "ada@example.com",
            "zipcode": "60601",
            "rating": 9,
            "comment": "Lovely lakefront",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Survey submitted successfully");
}

#[tokio::test]
async fn test_survey_rejects_email_mismatch() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    // The token identity wins; claiming another email is forbidden
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        Some(&token),
        Some(json!({
            "useremail": "mallory@example.com",
            "zipcode": "60601",
            "rating": 9,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_survey_validates_rating_and_zipcode() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    for rating in [0, 11, -3] {
        let (status, _) = common::send(
            &resources,
            "POST",
            "/api/submitSurvey",
            Some(&token),
            Some(json!({
                "useremail": "ada@example.com",
                "zipcode": "60601",
                "rating": rating,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rating {rating} accepted");
    }

    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        Some(&token),
        Some(json!({
            "useremail": "ada@example.com",
            "zipcode": "606",
            "rating": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_survey_missing_fields_are_bad_request() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    // rating absent
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        Some(&token),
        Some(json!({ "useremail": "ada@example.com", "zipcode": "60601" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // zipcode absent
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        Some(&token),
        Some(json!({ "useremail": "ada@example.com", "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_survey_requires_authentication() {
    let resources = common::test_resources().await;
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        None,
        Some(json!({
            "useremail": "ada@example.com",
            "zipcode": "60601",
            "rating": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
