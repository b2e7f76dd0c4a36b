use axum::{
    Json, Router,
    extract::{Path, Query, rejection::QueryRejection},
    routing::get,
};

use crate::error::{FieldError, ValidationError};
use crate::models::request::{GenerationRequest, RawQuery, missing_city};
use crate::models::series::{SeriesResponse, generate};

pub fn routes() -> Router {
    Router::new()
        .route("/timeseries", get(get_timeseries_without_city))
        .route("/timeseries/", get(get_timeseries_without_city))
        .route("/timeseries/{city}", get(get_timeseries))
}

async fn get_timeseries(
    Path(city): Path<String>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SeriesResponse>, ValidationError> {
    let Query(pairs) = pairs.map_err(|rejection| FieldError::MalformedQuery {
        reason: rejection.body_text(),
    })?;
    let query: RawQuery = pairs.into_iter().collect();
    let request = GenerationRequest::from_query(&city, query)?;
    Ok(Json(generate(&request)))
}

async fn get_timeseries_without_city() -> ValidationError {
    ValidationError::single(missing_city())
}
