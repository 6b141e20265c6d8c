// ABOUTME: Integration tests for review-access gated community data
// ABOUTME: Covers comment and crime stat visibility rules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_comments_require_review_access() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    let (status, body) = common::send(
        &resources,
        "GET",
        "/api/comments?zipcode=60601",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["details"]["reason"], "no-access");
}

#[tokio::test]
async fn test_comments_visible_with_review_access() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    // Leave a comment, then grant access and read it back
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/submitSurvey",
        Some(&token),
        Some(json!({
            "useremail": "ada@example.com",
            "zipcode": "60601",
            "rating": 8,
            "comment": "Great parks",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    resources
        .database
        .set_review_access("ada@example.com", true)
        .await
        .unwrap();

    let (status, body) = common::send(
        &resources,
        "GET",
        "/api/comments?zipcode=60601",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["comment"], "Great parks");
}

#[tokio::test]
async fn test_comments_require_authentication() {
    let resources = common::test_resources().await;
    let (status, _) =
        common::send(&resources, "GET", "/api/comments?zipcode=60601", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_crime_stats_gated_and_filtered() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    let (status, body) = common::send(
        &resources,
        "GET",
        "/api/crime?zipcode=60601",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["details"]["reason"], "no-access");

    resources
        .database
        .set_review_access("ada@example.com", true)
        .await
        .unwrap();

    // 12 recent thefts pass the >10 threshold; 2 burglaries and a pile of
    // stale thefts do not
    let now = Utc::now();
    for _ in 0..12 {
        resources
            .database
            .insert_crime_event("60601", "THEFT", now - Duration::days(5))
            .await
            .unwrap();
    }
    for _ in 0..2 {
        resources
            .database
            .insert_crime_event("60601", "BURGLARY", now - Duration::days(5))
            .await
            .unwrap();
    }
    for _ in 0..15 {
        resources
            .database
            .insert_crime_event("60601", "THEFT", now - Duration::days(120))
            .await
            .unwrap();
    }

    let (status, body) = common::send(
        &resources,
        "GET",
        "/api/crime?zipcode=60601",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stats = body.as_array().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["eventType"], "THEFT");
    assert_eq!(stats[0]["eventCount"], 12);
}

#[tokio::test]
async fn test_deleted_account_token_is_forbidden() {
    let resources = common::test_resources().await;
    let token = common::signup(&resources, "ada@example.com", "longenough").await;

    resources
        .database
        .delete_user_by_email("ada@example.com")
        .await
        .unwrap();

    let (status, _) = common::send(
        &resources,
        "GET",
        "/api/comments?zipcode=60601",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
