// ABOUTME: Integration tests for server wiring, health, and configuration
// ABOUTME: Covers the overlay document, health probe, and environment loading
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::io::Write;
use std::sync::Arc;

use http::StatusCode;
use serial_test::serial;

use happy_map_server::config::environment::DatabaseUrl;
use happy_map_server::config::ServerConfig;
use happy_map_server::server::ServerResources;

#[tokio::test]
async fn test_health_endpoint() {
    let resources = common::test_resources().await;
    let (status, body) = common::send(&resources, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "happy-map-server");
}

#[tokio::test]
async fn test_welcome_endpoint() {
    let resources = common::test_resources().await;
    let (status, body) = common::send(&resources, "GET", "/api", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello from server!");
}

#[tokio::test]
async fn test_geojson_unconfigured_is_404() {
    let resources = common::test_resources().await;
    let (status, _) = common::send(&resources, "GET", "/api/geojson", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_geojson_served_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"type":"FeatureCollection","features":[]}}"#
    )
    .unwrap();

    let mut config = common::test_config();
    config.geojson_path = Some(file.path().to_path_buf());
    let resources = Arc::new(ServerResources::new(config).await.unwrap());

    let (status, body) = common::send(&resources, "GET", "/api/geojson", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
}

#[tokio::test]
async fn test_invalid_geojson_fails_startup() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json at all").unwrap();

    let mut config = common::test_config();
    config.geojson_path = Some(file.path().to_path_buf());
    assert!(ServerResources::new(config).await.is_err());
}

#[test]
#[serial]
fn test_config_from_env() {
    std::env::set_var("HTTP_PORT", "9102");
    std::env::set_var("JWT_SECRET", "an-explicit-secret-for-tests");
    std::env::set_var("ADMIN_PASSWORD", "from-the-environment");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9102);
    assert_eq!(config.auth.jwt_secret, b"an-explicit-secret-for-tests");
    assert_eq!(config.auth.admin_password, "from-the-environment");
    assert!(matches!(config.database.url, DatabaseUrl::Memory));

    std::env::remove_var("HTTP_PORT");
    std::env::remove_var("JWT_SECRET");
    std::env::remove_var("ADMIN_PASSWORD");
    std::env::remove_var("DATABASE_URL");
}

#[test]
#[serial]
fn test_config_rejects_bad_port() {
    std::env::set_var("HTTP_PORT", "not-a-port");
    let result = ServerConfig::from_env();
    std::env::remove_var("HTTP_PORT");
    assert!(result.is_err());
}
