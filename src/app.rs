use axum::Router;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes::{metrics, openapi, timeseries};

pub const SERVICE_TITLE: &str = "Weather Time Series API";
pub const SERVICE_DESCRIPTION: &str = "Generate random time series data for any city - \
    Perfect for testing with realistic time series datasets";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_URL: &str = "http://localhost:8000";

// Requests share nothing, so the router carries no state.
pub fn create_app() -> Router {
    Router::new()
        .merge(timeseries::routes())
        .merge(metrics::routes())
        .merge(openapi::routes())
        .layer(
            TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
