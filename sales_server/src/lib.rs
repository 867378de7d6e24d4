//! # sales-server
//!
//! HTTP front end for the monthly sales forecasting service.
//! Handlers share one immutable [`SalesContext`] built at startup.

use axum::routing::{get, post};
use axum::Router;
use sales_report::SalesContext;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod html;
pub mod routes;

pub use error::AppError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<SalesContext>,
}

impl AppState {
    pub fn new(context: SalesContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}

/// Build the router with every page, artifact and health endpoint
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::liveness))
        .route("/predict", post(routes::predict))
        .route("/generate_report", get(routes::generate_report))
        .route("/generated_bar_graph", get(routes::generated_bar_graph))
        .route("/generated_dotted_graph", get(routes::generated_dotted_graph))
        .route("/generated_combined_graph", get(routes::generated_combined_graph))
        .route("/write_predicted_sales", get(routes::write_predicted_sales))
        .route("/metrics", get(routes::metrics))
        .route("/generated_metrics_graph", get(routes::generated_metrics_graph))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
