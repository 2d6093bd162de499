//! Error responses for the HTTP API.

use crate::agent::AgentError;
use crate::analysis::AnalyzeError;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// API error: status code, body, and an optional `Retry-After`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    fn new(status: StatusCode, error: &str) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                error: error.to_string(),
                details: None,
                suggestion: None,
            },
            retry_after_secs: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.body.suggestion = Some(suggestion.to_string());
        self
    }

    /// Create a bad request error (400).
    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Body could not be read as JSON. Oversized bodies keep their 413.
    pub fn invalid_body(rejection: &JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, "Invalid JSON body").with_details(rejection.body_text())
    }

    /// Create a rate limit error (429).
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        let mut error = Self::new(StatusCode::TOO_MANY_REQUESTS, "Too many requests")
            .with_suggestion("Please wait a minute before trying again");
        error.retry_after_secs = Some(retry_after_secs);
        error
    }

    /// Server is misconfigured (500).
    pub fn configuration(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Model provider call failed (500).
    pub fn upstream(error: &AgentError) -> Self {
        match error {
            AgentError::InvalidResponse(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Invalid response from AI model")
                    .with_details(error.to_string())
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to analyze symptoms")
                .with_details(error.to_string())
                .with_suggestion("Please try again later"),
        }
    }

    /// Model reply could not be coerced into a result (500).
    pub fn unparseable(details: String) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not interpret AI model response",
        )
        .with_details(details)
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(error: AnalyzeError) -> Self {
        match error {
            AnalyzeError::Validation(e) => ApiError::bad_request(&e.to_string()),
            AnalyzeError::RateLimited { retry_after_secs } => {
                ApiError::rate_limited(retry_after_secs)
            }
            AnalyzeError::Configuration(message) => ApiError::configuration(&message),
            AnalyzeError::Upstream(e) => ApiError::upstream(&e),
            AnalyzeError::Parse(e) => ApiError::unparseable(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
