//! # sales-server
//!
//! Loads the sales history, fits the model once and serves the forecasting
//! pages over HTTP.

use sales_report::{AppConfig, SalesContext};
use sales_server::{create_router, AppState};
use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_server=info,sales_report=info,tower_http=info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // The model is fit here, once; nothing is served without it.
    let context = match SalesContext::load(config) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without sales history");
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(AppState::new(context));

    // Server configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, host = %host, port = %port, "Invalid HOST:PORT configuration");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Cannot bind listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("sales-server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
