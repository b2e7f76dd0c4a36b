use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::debug;
use serde_json::{Value, json};
use thiserror::Error;

/// Where in the request an offending value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
}

impl Location {
    fn as_str(&self) -> &'static str {
        match self {
            Location::Path => "path",
            Location::Query => "query",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Field required")]
    Missing {
        location: Location,
        field: &'static str,
    },
    #[error("Input should be a valid integer, unable to parse string as an integer")]
    NotAnInteger { field: &'static str, input: String },
    #[error("Input should be greater than or equal to {min}")]
    TooSmall {
        field: &'static str,
        input: String,
        min: i64,
    },
    #[error("Input should be less than or equal to {max}")]
    TooLarge {
        field: &'static str,
        input: String,
        max: i64,
    },
    #[error("Invalid query string: {reason}")]
    MalformedQuery { reason: String },
}

impl FieldError {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::Missing { .. } => "missing",
            FieldError::NotAnInteger { .. } => "int_parsing",
            FieldError::TooSmall { .. } => "greater_than_equal",
            FieldError::TooLarge { .. } => "less_than_equal",
            FieldError::MalformedQuery { .. } => "query_parsing",
        }
    }

    /// Request location followed by the field name, if there is one.
    pub fn loc(&self) -> Vec<&'static str> {
        match self {
            FieldError::Missing { location, field } => vec![location.as_str(), field],
            FieldError::NotAnInteger { field, .. }
            | FieldError::TooSmall { field, .. }
            | FieldError::TooLarge { field, .. } => vec![Location::Query.as_str(), field],
            FieldError::MalformedQuery { .. } => vec![Location::Query.as_str()],
        }
    }

    fn to_json(&self) -> Value {
        let mut detail = json!({
            "type": self.kind(),
            "loc": self.loc(),
            "msg": self.to_string(),
        });
        match self {
            FieldError::Missing { .. } | FieldError::MalformedQuery { .. } => {
                detail["input"] = Value::Null;
            }
            FieldError::NotAnInteger { input, .. } => {
                detail["input"] = json!(input);
            }
            FieldError::TooSmall { input, min, .. } => {
                detail["input"] = json!(input);
                detail["ctx"] = json!({ "ge": min });
            }
            FieldError::TooLarge { input, max, .. } => {
                detail["input"] = json!(input);
                detail["ctx"] = json!({ "le": max });
            }
        }
        detail
    }
}

/// A request rejected before any generation work was done. Carries every
/// offending field, not just the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid request: {}", describe(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{} ({})", error.loc().join("."), error))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn single(error: FieldError) -> ValidationError {
        ValidationError {
            errors: vec![error],
        }
    }
}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        ValidationError::single(error)
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        debug!("Rejecting request: {}", self);
        let detail: Vec<Value> = self.errors.iter().map(FieldError::to_json).collect();
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": detail })),
        )
            .into_response()
    }
}
