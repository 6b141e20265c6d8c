// ABOUTME: Integration tests for the admin console API
// ABOUTME: Covers login rate limiting, role gating, and whitelist enforcement
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_admin_login_issues_token() {
    let resources = common::test_resources().await;

    let (status, body) = common::send(
        &resources,
        "POST",
        "/api/adminlogin",
        None,
        Some(json!({ "password": common::ADMIN_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_admin_login_rejects_wrong_password() {
    let resources = common::test_resources().await;

    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/adminlogin",
        None,
        Some(json!({ "password": "not-the-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login_rate_limited_per_ip() {
    let resources = common::test_resources().await;
    let body = json!({ "password": "not-the-password" });

    // Five attempts fill the window for this IP
    for _ in 0..5 {
        let (status, _) = common::send_from_ip(
            &resources,
            "198.51.100.7",
            "POST",
            "/api/adminlogin",
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // The sixth is blocked even with the correct password
    let (status, _) = common::send_from_ip(
        &resources,
        "198.51.100.7",
        "POST",
        "/api/adminlogin",
        Some(json!({ "password": common::ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // A different IP is unaffected
    let (status, _) = common::send_from_ip(
        &resources,
        "198.51.100.8",
        "POST",
        "/api/adminlogin",
        Some(json!({ "password": common::ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_reject_user_tokens() {
    let resources = common::test_resources().await;
    let user_token = common::signup(&resources, "ada@example.com", "longenough").await;

    // Well-formed payloads so only the role check can reject them
    let cases = [
        (
            "/api/updatefield",
            Some(json!({ "zipcode": "60601", "attribute": "medianRent", "value": 1.0 })),
        ),
        (
            "/api/updateParameters",
            Some(json!({
                "targetComponentName": "totalHappinessScore",
                "parameter": "intercept",
                "value": 1.0,
            })),
        ),
        ("/api/recalculateHappinessIndex", None),
        ("/api/filterOutliers", None),
    ];

    for (uri, body) in cases {
        let (status, _) = common::send(&resources, "POST", uri, Some(&user_token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "user token accepted on {uri}");
    }
}

#[tokio::test]
async fn test_update_field_whitelist_and_lookup() {
    let resources = common::test_resources().await;
    let token = common::admin_token(&resources).await;
    resources
        .database
        .insert_zip_area("60601", "Chicago", "IL")
        .await
        .unwrap();

    // Whitelisted attribute on a known ZIP code
    let (status, body) = common::send(
        &resources,
        "POST",
        "/api/updatefield",
        Some(&token),
        Some(json!({ "zipcode": "60601", "attribute": "medianRent", "value": 1825.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Unknown attribute never reaches SQL
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updatefield",
        Some(&token),
        Some(json!({
            "zipcode": "60601",
            "attribute": "medianRent; DROP TABLE users",
            "value": 1.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown ZIP code
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updatefield",
        Some(&token),
        Some(json!({ "zipcode": "99999", "attribute": "medianRent", "value": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_parameters_whitelist_and_lookup() {
    let resources = common::test_resources().await;
    let token = common::admin_token(&resources).await;
    resources
        .database
        .insert_regression_target("totalHappinessScore")
        .await
        .unwrap();

    let (status, body) = common::send(
        &resources,
        "POST",
        "/api/updateParameters",
        Some(&token),
        Some(json!({
            "targetComponentName": "totalHappinessScore",
            "parameter": "medianRentParam",
            "value": -0.42,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Parameter 'medianRentParam' updated successfully.");

    // Invalid target component
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updateParameters",
        Some(&token),
        Some(json!({
            "targetComponentName": "passwordHash",
            "parameter": "medianRentParam",
            "value": 1.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Invalid coefficient name
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updateParameters",
        Some(&token),
        Some(json!({
            "targetComponentName": "totalHappinessScore",
            "parameter": "intercept; --",
            "value": 1.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Target with no coefficient row
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updateParameters",
        Some(&token),
        Some(json!({
            "targetComponentName": "economicWellbeingScore",
            "parameter": "intercept",
            "value": 1.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_missing_fields_are_bad_request() {
    let resources = common::test_resources().await;
    let token = common::admin_token(&resources).await;

    // Login without a password field at all
    let (status, _) =
        common::send(&resources, "POST", "/api/adminlogin", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Field update without a value
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updatefield",
        Some(&token),
        Some(json!({ "zipcode": "60601", "attribute": "medianRent" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Parameter update without a parameter name
    let (status, _) = common::send(
        &resources,
        "POST",
        "/api/updateParameters",
        Some(&token),
        Some(json!({ "targetComponentName": "totalHappinessScore", "value": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scoring_triggers_require_admin() {
    let resources = common::test_resources().await;

    for uri in ["/api/recalculateHappinessIndex", "/api/filterOutliers"] {
        let (status, _) = common::send(&resources, "POST", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "unauthenticated {uri}");
    }
}
