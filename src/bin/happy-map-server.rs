// ABOUTME: Main binary for the happiness index API server
// ABOUTME: Loads configuration, connects the database, and serves HTTP
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Server entry point

use anyhow::Result;
use clap::Parser;
use tracing::info;

use happy_map_server::config::ServerConfig;
use happy_map_server::logging;
use happy_map_server::server::{serve, ServerResources};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "happy-map-server",
    about = "Happiness index API server - ZIP-code wellbeing scores, surveys, and admin tuning",
    version
)]
struct Args {
    /// HTTP listen port (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    info!("Configuration: {}", config.summary());

    let resources = Arc::new(ServerResources::new(config).await?);

    let port = resources.config.http_port;
    info!("API endpoints:");
    info!("  GET    http://localhost:{port}/api                          - Welcome");
    info!("  GET    http://localhost:{port}/api/geojson                  - Map overlay");
    info!("  GET    http://localhost:{port}/api/details?zipcode=         - Happiness scores");
    info!("  GET    http://localhost:{port}/api/comments?zipcode=        - Survey comments (gated)");
    info!("  GET    http://localhost:{port}/api/crime?zipcode=           - Crime statistics (gated)");
    info!("  POST   http://localhost:{port}/api/auth/signup              - Register");
    info!("  POST   http://localhost:{port}/api/auth/signin              - Sign in");
    info!("  POST   http://localhost:{port}/api/auth/signout             - Sign out");
    info!("  DELETE http://localhost:{port}/api/auth/deleteUser          - Delete account");
    info!("  POST   http://localhost:{port}/api/submitSurvey             - Submit survey");
    info!("  POST   http://localhost:{port}/api/adminlogin               - Admin login");
    info!("  POST   http://localhost:{port}/api/updatefield              - Update ZIP attribute");
    info!("  POST   http://localhost:{port}/api/updateParameters         - Update regression parameter");
    info!("  POST   http://localhost:{port}/api/recalculateHappinessIndex - Recompute scores");
    info!("  POST   http://localhost:{port}/api/filterOutliers           - Filter survey outliers");
    info!("  GET    http://localhost:{port}/api/news/:zipcode            - News by ZIP code");
    info!("  GET    http://localhost:{port}/api/news/city/:city          - News by city");
    info!("  GET    http://localhost:{port}/health                       - Health check");

    serve(resources).await
}
