use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::app::{SERVICE_DESCRIPTION, SERVICE_TITLE, SERVICE_URL, SERVICE_VERSION};
use crate::models::metric::Metric;
use crate::models::request::{
    DAYS_RANGE, DEFAULT_DAYS, DEFAULT_METRIC, DEFAULT_POINTS_PER_DAY, POINTS_PER_DAY_RANGE,
};

pub fn routes() -> Router {
    Router::new().route("/openapi.json", get(get_openapi))
}

async fn get_openapi() -> Json<Value> {
    Json(openapi_document())
}

fn validation_error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "detail": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["loc", "msg", "type"],
                    "properties": {
                        "loc": {"type": "array", "items": {"type": "string"}},
                        "msg": {"type": "string"},
                        "type": {"type": "string"},
                        "input": {},
                        "ctx": {"type": "object"},
                    },
                },
            },
        },
    })
}

/// Describes every route the service answers, with the same bounds and
/// defaults the handlers enforce.
pub fn openapi_document() -> Value {
    let metric_examples: serde_json::Map<String, Value> = Metric::ALL
        .iter()
        .map(|metric| (metric.name().to_string(), json!({ "value": metric.name() })))
        .collect();
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": SERVICE_TITLE,
            "description": SERVICE_DESCRIPTION,
            "version": SERVICE_VERSION,
        },
        "servers": [
            {"url": SERVICE_URL, "description": "Local server"},
        ],
        "tags": [
            {"name": "timeseries", "description": "Time series data generation endpoints"},
            {"name": "utilities", "description": "Helper endpoints for testing"},
        ],
        "paths": {
            "/timeseries/{city}": {
                "get": {
                    "tags": ["timeseries"],
                    "operationId": "timeseries",
                    "description": "Generate a time series dataset for a given city and metric",
                    "parameters": [
                        {
                            "name": "city",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "string"},
                        },
                        {
                            "name": "metric",
                            "in": "query",
                            "required": false,
                            "description": "Metric type to generate",
                            "schema": {"type": "string", "default": DEFAULT_METRIC},
                            "examples": metric_examples,
                        },
                        {
                            "name": "days",
                            "in": "query",
                            "required": false,
                            "description": "Number of days of historical data to generate",
                            "schema": {
                                "type": "integer",
                                "minimum": DAYS_RANGE.start(),
                                "maximum": DAYS_RANGE.end(),
                                "default": DEFAULT_DAYS,
                            },
                        },
                        {
                            "name": "points_per_day",
                            "in": "query",
                            "required": false,
                            "description": "Data points per day (24=hourly, 144=every 10 minutes)",
                            "schema": {
                                "type": "integer",
                                "minimum": POINTS_PER_DAY_RANGE.start(),
                                "maximum": POINTS_PER_DAY_RANGE.end(),
                                "default": DEFAULT_POINTS_PER_DAY,
                            },
                        },
                    ],
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": {"application/json": {"schema": {
                                "$ref": "#/components/schemas/TimeSeriesResponse"
                            }}},
                        },
                        "422": {
                            "description": "Validation Error",
                            "content": {"application/json": {"schema": {
                                "$ref": "#/components/schemas/HTTPValidationError"
                            }}},
                        },
                    },
                },
            },
            "/metrics": {
                "get": {
                    "tags": ["utilities"],
                    "operationId": "available_metrics",
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": {"application/json": {"schema": {
                                "type": "object",
                                "properties": {
                                    "metrics": {"type": "array", "items": {"type": "string"}},
                                },
                            }}},
                        },
                    },
                },
            },
        },
        "components": {
            "schemas": {
                "DataPoint": {
                    "type": "object",
                    "required": ["timestamp", "value"],
                    "properties": {
                        "timestamp": {"type": "string"},
                        "value": {"type": "number"},
                    },
                },
                "TimeSeriesResponse": {
                    "type": "object",
                    "required": ["city", "metric", "data", "total_points"],
                    "properties": {
                        "city": {"type": "string"},
                        "metric": {"type": "string"},
                        "data": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/DataPoint"},
                        },
                        "total_points": {"type": "integer"},
                    },
                },
                "HTTPValidationError": validation_error_schema(),
            },
        },
    })
}
