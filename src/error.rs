//! # Error Handling
//!
//! This module provides unified error handling for the Leadscout API,
//! implementing a consistent problem+json response format with trace ID
//! propagation, plus the domain error kinds used by the repository and the
//! ingestion/enrichment/pitch services.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::providers::ProviderError;
use crate::telemetry;

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new<S: Into<String>>(status: StatusCode, code: S, message: S) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Extract current trace ID from the active trace context (falls back to a
    /// generated correlation ID so clients can always quote one back).
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str())
            })
    }
}

/// Errors surfaced by the lead repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("lead not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RepositoryError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        RepositoryError::Validation(message.into())
    }
}

/// Ingestion failed as a whole; leads already committed stay in the store.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("maps provider call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Enrichment of a single lead failed, or the batch failed before any
/// per-lead work started. Inside a batch, per-lead failures are logged and
/// skipped rather than propagated.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("website-crawling provider call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Pitch generation failed for a single lead; the lead is left unmodified.
#[derive(Debug, Error)]
pub enum PitchGenerationError {
    #[error("text-generation provider call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        (self.status, headers, axum::Json(self)).into_response()
    }
}

// Error mappers for common sources

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", error);

        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "An internal error occurred",
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(error: sea_orm::DbErr) -> Self {
        match error {
            sea_orm::DbErr::RecordNotFound(record) => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("Record not found: {}", record),
            ),
            sea_orm::DbErr::Conn(connection_err) => {
                tracing::error!("Database connection error: {:?}", connection_err);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service unavailable",
                )
            }
            _ => {
                tracing::error!("Database error: {:?}", error);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Database error occurred",
                )
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Lead not found")
            }
            RepositoryError::Validation(message) => {
                Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
            }
            RepositoryError::Database(db_err) => db_err.into(),
        }
    }
}

impl From<IngestionError> for ApiError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::Provider(provider_err) => provider_error("maps", &provider_err),
            IngestionError::Repository(repo_err) => repo_err.into(),
        }
    }
}

impl From<EnrichmentError> for ApiError {
    fn from(error: EnrichmentError) -> Self {
        match error {
            EnrichmentError::Provider(provider_err) => provider_error("crawler", &provider_err),
            EnrichmentError::Repository(repo_err) => repo_err.into(),
        }
    }
}

impl From<PitchGenerationError> for ApiError {
    fn from(error: PitchGenerationError) -> Self {
        match error {
            PitchGenerationError::Provider(provider_err) => {
                provider_error("text-generation", &provider_err)
            }
            PitchGenerationError::Repository(repo_err) => repo_err.into(),
        }
    }
}

/// Map an upstream provider failure to a 502 PROVIDER_ERROR with provider and
/// upstream-status metadata in the details.
pub fn provider_error(provider: &str, error: &ProviderError) -> ApiError {
    let (status, body_snippet) = match error {
        ProviderError::Http { status, body } => (
            Some(*status),
            body.as_deref().map(|b| {
                if b.chars().count() > 200 {
                    let truncated: String = b.chars().take(200).collect();
                    format!("{}...", truncated)
                } else {
                    b.to_string()
                }
            }),
        ),
        _ => (None, None),
    };

    ApiError::new(
        StatusCode::BAD_GATEWAY,
        "PROVIDER_ERROR",
        &format!("Provider {} call failed: {}", provider, error),
    )
    .with_details(json!({
        "provider": provider,
        "status": status,
        "body_snippet": body_snippet,
    }))
}

/// Create an unauthorized error (401)
pub fn unauthorized(message: Option<&str>) -> ApiError {
    let msg = message.unwrap_or("Authentication required");
    ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
}

/// Create a validation error with field details
pub fn validation_error(message: &str, field_errors: serde_json::Value) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message).with_details(field_errors)
}
