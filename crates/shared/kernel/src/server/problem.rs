use atelier_derive::api_model;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;

#[api_model]
/// Error body returned by API handlers.
pub struct Problem {
    /// HTTP status code
    status: u16,
    /// Human-readable summary
    title: String,
    /// Per-field validation messages, present on 422 responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, String>>,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self { status: status.as_u16(), title: title.into(), errors: None }
    }

    /// A 422 with one message per offending field.
    #[must_use]
    pub fn unprocessable(errors: BTreeMap<String, String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            title: "Validation failed".into(),
            errors: Some(errors),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        self.errors.as_ref()
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
