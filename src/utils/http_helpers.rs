use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::error;

use crate::models::ValidationError;
use crate::store::StoreError;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
///
/// The body is always `{"error": "<message>"}`, optionally extended with
/// extra top-level fields such as the list of missing request fields.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
    details: Map<String, Value>,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
            details: Map::new(),
        }
    }

    /// Adds an extra top-level field to the error body.
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Converts our `HTTPError` into a JSON response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let mut body = self.details;
        body.insert("error".to_string(), Value::String(self.message));
        (self.status, Json(Value::Object(body))).into_response()
    }
}

/// Duplicates are a client error; anything else from the store is ours.
impl From<StoreError> for HTTPError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => HTTPError::bad_request(e.to_string()),
            StoreError::Backend(ref message) => {
                error!("Store error: {}", message);
                HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<ValidationError> for HTTPError {
    fn from(e: ValidationError) -> Self {
        let message = if e.missing.is_empty() {
            "Invalid employee fields".to_string()
        } else {
            format!("Missing required fields: {}", e.missing.join(", "))
        };
        HTTPError::bad_request(message)
            .with_detail("missing", json!(e.missing))
            .with_detail("invalid", json!(e.invalid))
    }
}

/// Malformed JSON, a wrong content type or a non-object body are all reported as 400.
impl From<JsonRejection> for HTTPError {
    fn from(rejection: JsonRejection) -> Self {
        HTTPError::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}
