// ABOUTME: Shared test fixtures: in-memory server resources and request helpers
// ABOUTME: Drives the full router through tower::ServiceExt::oneshot
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use happy_map_server::config::environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, RateLimitConfig, ServerConfig,
};
use happy_map_server::server::{router, ServerResources};

pub const ADMIN_PASSWORD: &str = "test-admin-password";

/// Configuration pointed at a fresh in-memory database
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        http_port: 0,
        environment: Environment::Testing,
        log_level: LogLevel::Warn,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        auth: AuthConfig {
            jwt_secret: b"integration-test-secret-integration-test-secret".to_vec(),
            jwt_expiry_hours: 1,
            admin_token_expiry_hours: 1,
            admin_password: ADMIN_PASSWORD.into(),
        },
        rate_limit: RateLimitConfig {
            max_attempts: 5,
            window_secs: 900,
        },
        geojson_path: None,
    }
}

/// Fresh resources with an empty in-memory database
pub async fn test_resources() -> Arc<ServerResources> {
    Arc::new(ServerResources::new(test_config()).await.unwrap())
}

/// Issue one request against a fresh router for the given resources
pub async fn send(
    resources: &Arc<ServerResources>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app: Router = router(resources.clone());

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Issue one request with a spoofed client IP via `X-Forwarded-For`
pub async fn send_from_ip(
    resources: &Arc<ServerResources>,
    ip: &str,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app: Router = router(resources.clone());

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", ip);

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => {
            builder = builder.header("content-length", "0");
            builder.body(Body::empty()).unwrap()
        }
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Register a user and return their access token
pub async fn signup(resources: &Arc<ServerResources>, email: &str, password: &str) -> String {
    let (status, body) = send(
        resources,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "email": email,
            "firstName": "Test",
            "lastName": "User",
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["accessToken"].as_str().unwrap().to_owned()
}

/// Log into the admin console and return the admin token
pub async fn admin_token(resources: &Arc<ServerResources>) -> String {
    let (status, body) = send(
        resources,
        "POST",
        "/api/adminlogin",
        None,
        Some(json!({ "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().unwrap().to_owned()
}
