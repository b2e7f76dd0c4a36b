use axum::{Json, Router, routing::get};

use crate::models::metric::{MetricsCatalog, list_metrics};

pub fn routes() -> Router {
    Router::new().route("/metrics", get(get_metrics))
}

async fn get_metrics() -> Json<MetricsCatalog> {
    Json(list_metrics())
}
