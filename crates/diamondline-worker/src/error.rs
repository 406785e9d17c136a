//! Diamondline worker: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diamondline_cards::application::ports::CatalogError;
use diamondline_cards::domain::values::CardExternalId;
use diamondline_core::error::DomainError;
use diamondline_reconciliation::error::ReconcileError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the worker.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// One failed work item inside an error response.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub card_external_id: Option<CardExternalId>,
    pub message: String,
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Every failed work item of an interrupted batch.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureBody>,
}

/// HTTP-layer wrapper around `ReconcileError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub ReconcileError);

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

fn classify(err: &ReconcileError) -> (StatusCode, &'static str) {
    match err {
        ReconcileError::NoCardsFound { .. } | ReconcileError::Catalog(CatalogError::Empty(_)) => {
            (StatusCode::NOT_FOUND, "no_cards_found")
        }
        ReconcileError::CardNotFoundForUpdate { .. }
        | ReconcileError::Domain(DomainError::AggregateNotFound(_)) => {
            (StatusCode::NOT_FOUND, "card_not_found")
        }
        ReconcileError::ExternalCardMissingForAddition { .. }
        | ReconcileError::Catalog(CatalogError::NotFound { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "external_card_missing")
        }
        ReconcileError::BatchInterrupted { .. } => (StatusCode::CONFLICT, "batch_interrupted"),
        ReconcileError::AttributeDrift { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "attribute_drift")
        }
        ReconcileError::Domain(DomainError::AlreadyExists(_)) => {
            (StatusCode::CONFLICT, "already_exists")
        }
        ReconcileError::Domain(DomainError::Validation(_)) => {
            (StatusCode::BAD_REQUEST, "validation_error")
        }
        ReconcileError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
        ReconcileError::Catalog(CatalogError::Unavailable(_)) => {
            (StatusCode::BAD_GATEWAY, "catalog_unavailable")
        }
        ReconcileError::Feed(_) => (StatusCode::BAD_GATEWAY, "feed_unavailable"),
        ReconcileError::InvalidSeasonStart { .. }
        | ReconcileError::Domain(DomainError::Infrastructure(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = classify(&self.0);

        let failures = match &self.0 {
            ReconcileError::BatchInterrupted { failures, .. } => failures
                .iter()
                .map(|failure| FailureBody {
                    card_external_id: failure.card_external_id,
                    message: failure.error.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            failures,
        };

        (status, Json(body)).into_response()
    }
}
