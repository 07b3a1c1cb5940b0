//! API error type and its HTTP mapping
//!
//! Every failure crossing the handler boundary becomes a structured
//! `{ "error": ..., "details"? }` payload; the process never crashes on a
//! request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use syntestify_generator::GeneratorError;
use syntestify_store::StoreError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error message
    pub error: String,

    /// Optional upstream detail (e.g. the completion API's response body)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Required request field absent or empty
    MissingField(&'static str),

    /// Identifier failed to parse
    InvalidId(&'static str),

    /// Referenced entity does not exist
    NotFound(&'static str),

    /// Completion credential not configured
    MissingApiKey,

    /// Generation pipeline failure
    Generation(GeneratorError),

    /// Persistence failure
    Store(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingApiKey
            | ApiError::Generation(_)
            | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            ApiError::MissingField(message) => ErrorBody {
                error: message.to_string(),
                details: None,
            },
            ApiError::InvalidId(message) => ErrorBody {
                error: message.to_string(),
                details: None,
            },
            ApiError::NotFound(message) => ErrorBody {
                error: message.to_string(),
                details: None,
            },
            ApiError::MissingApiKey => ErrorBody {
                error: "Missing OpenAI API key".to_string(),
                details: None,
            },
            ApiError::Generation(GeneratorError::Completion(detail)) => ErrorBody {
                error: "Failed to call OpenAI API".to_string(),
                details: Some(detail),
            },
            ApiError::Generation(e) => ErrorBody {
                error: e.to_string(),
                details: None,
            },
            ApiError::Store(message) => ErrorBody {
                error: message,
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}

impl From<GeneratorError> for ApiError {
    fn from(e: GeneratorError) -> Self {
        ApiError::Generation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e.to_string())
    }
}
