// ABOUTME: Server resource wiring and HTTP router assembly
// ABOUTME: Owns the shared state handed to every route handler
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Server Module
//!
//! Builds the shared [`ServerResources`] once at startup and assembles the
//! axum router from the per-domain route modules. Handlers receive the
//! resources through `State` as a single `Arc`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{hash_password, AuthManager};
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::rate_limiting::LoginRateLimiter;
use crate::routes;

/// Shared state for all route handlers
pub struct ServerResources {
    /// Database pool and operations
    pub database: Database,
    /// Token issuance and validation
    pub auth: AuthManager,
    /// Admin login rate limiter
    pub login_limiter: LoginRateLimiter,
    /// Bcrypt hash of the admin console password, computed at startup
    pub admin_password_hash: String,
    /// ZIP-area overlay document served to the map client
    pub geojson: Option<serde_json::Value>,
    /// Full server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Connect the database, hash the admin password, and load the overlay
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable, the admin password
    /// cannot be hashed, or a configured GeoJSON document fails to parse
    pub async fn new(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database.url).await?;

        let auth = AuthManager::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiry_hours,
            config.auth.admin_token_expiry_hours,
        );

        let login_limiter = LoginRateLimiter::new(&config.rate_limit);

        let admin_password_hash = hash_password(config.auth.admin_password.clone()).await?;

        let geojson = match &config.geojson_path {
            Some(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    AppError::config(format!("Cannot read GeoJSON at {}: {e}", path.display()))
                })?;
                let document = serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::config(format!("Invalid GeoJSON document: {e}")))?;
                info!(path = %path.display(), "Loaded ZIP-area overlay");
                Some(document)
            }
            None => {
                warn!("GEOJSON_PATH not set; the map overlay endpoint will return 404");
                None
            }
        };

        Ok(Self {
            database,
            auth,
            login_limiter,
            admin_password_hash,
            geojson,
            config,
        })
    }
}

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(routes::health::HealthRoutes::routes(resources.clone()))
        .merge(routes::api::ApiRoutes::routes(resources.clone()))
        .merge(routes::auth::AuthRoutes::routes(resources.clone()))
        .merge(routes::scores::ScoreRoutes::routes(resources.clone()))
        .merge(routes::surveys::SurveyRoutes::routes(resources.clone()))
        .merge(routes::community::CommunityRoutes::routes(resources.clone()))
        .merge(routes::admin::AdminRoutes::routes(resources.clone()))
        .merge(routes::news::NewsRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
}

/// Bind and serve until the process is stopped
///
/// # Errors
///
/// Returns an error if binding or serving fails
pub async fn serve(resources: Arc<ServerResources>) -> anyhow::Result<()> {
    let addr = SocketAddr::new(resources.config.http_host, resources.config.http_port);
    let app = router(resources);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received");
}
