//! Error types for the HTTP layer.
//!
//! Every failure leaves a handler as an [`ApiError`], rendered as
//! `{ "code": ..., "message": ... }` with the matching status.
//!
//! ```text
//! ┌──────────────────────────────────┬────────┬────────────────────────────┐
//! │ Source                           │ Status │ code                       │
//! ├──────────────────────────────────┼────────┼────────────────────────────┤
//! │ ValidationError                  │ 422    │ VALIDATION_ERROR           │
//! │ InsufficientInventory            │ 409    │ INSUFFICIENT_INVENTORY     │
//! │ InvalidStatusTransition          │ 409    │ INVALID_STATUS_TRANSITION  │
//! │ RoomTypeNotFound/BookingNotFound │ 404    │ NOT_FOUND                  │
//! │ Forbidden                        │ 403    │ FORBIDDEN                  │
//! │ missing / bad bearer token       │ 401    │ UNAUTHORIZED               │
//! │ DbError (persistence fault)      │ 500    │ DATABASE_ERROR             │
//! └──────────────────────────────────┴────────┴────────────────────────────┘
//! ```
//!
//! Persistence faults are logged with their cause; the client only sees a
//! generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roomledger_core::{CoreError, ValidationError};
use roomledger_db::{DbError, LedgerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (for client error handling)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// HTTP-facing error.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    /// Internal cause, logged but never serialized.
    source: Option<anyhow::Error>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an internal cause for logging.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 401 Unauthorized.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// 403 Forbidden.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// 422 Unprocessable Entity.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    /// 500 Internal Server Error for store failures.
    pub fn database(err: DbError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            "The booking store is unavailable, please retry",
        )
        .with_source(err)
    }

    /// 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    error = %source,
                    "Request failed"
                ),
                None => tracing::error!(status = %self.status, code = self.code, message = %self.message, "Request failed"),
            }
        } else {
            tracing::debug!(status = %self.status, code = self.code, message = %self.message, "Request rejected");
        }

        let body = ErrorBody {
            code: self.code.to_string(),
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => ApiError::from(inner),
            CoreError::RoomTypeNotFound(_) | CoreError::BookingNotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            CoreError::InsufficientInventory { .. } => {
                ApiError::new(StatusCode::CONFLICT, "INSUFFICIENT_INVENTORY", err.to_string())
            }
            CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(StatusCode::CONFLICT, "INVALID_STATUS_TRANSITION", err.to_string())
            }
            CoreError::Forbidden { .. } => ApiError::forbidden(err.to_string()),
            CoreError::PriceOverflow { .. } => ApiError::validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::database(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(core) => ApiError::from(core),
            LedgerError::Persistence(db) => ApiError::from(db),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roomledger_core::BookingStatus;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_business_rejections_map_to_client_errors() {
        let err: ApiError = LedgerError::Rejected(CoreError::InsufficientInventory {
            room_type_id: 1,
            start_date: date(1),
            end_date: date(4),
            missing_nights: vec![date(2)],
            sold_out_nights: vec![],
        })
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INSUFFICIENT_INVENTORY");

        let err: ApiError = CoreError::BookingNotFound(9).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::forbidden(3, "booking 9").into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err: ApiError = CoreError::InvalidStatusTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        }
        .into();
        assert_eq!(err.code(), "INVALID_STATUS_TRANSITION");

        let err: ApiError = CoreError::Validation(ValidationError::EmptyStay {
            start_date: date(2),
            end_date: date(2),
        })
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_persistence_fault_hides_details() {
        let err: ApiError = LedgerError::Persistence(DbError::QueryFailed("disk I/O error".to_string())).into();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(!err.to_string().contains("disk"));
    }
}
