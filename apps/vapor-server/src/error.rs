//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vapor POS                              │
//! │                                                                         │
//! │  Handler  Result<T, ApiError>                                           │
//! │     │                                                                   │
//! │     ├── bad JSON body ──────── JsonRejection ────────┐                  │
//! │     ├── validate_create_bill ─ ValidationError ──────┤                  │
//! │     ├── verify_total ───────── CoreError ────────────┼──► ApiError      │
//! │     └── db.bills().create ──── DbError ──────────────┘       │          │
//! │                                  (logged, message hidden)    │          │
//! │                                                              ▼          │
//! │                                     (StatusCode, Json<ApiError>)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "items must not be empty",
//!   "field": "items"
//! }
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vapor_core::{CoreError, ValidationError};
use vapor_db::DbError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending request field, when the failure is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// A computation the server cannot represent, e.g. an overflowing
    /// report total (500)
    Internal,

    /// Storage unreachable or saturated (503)
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Attaches the offending field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Storage details go to the log; clients only get a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let err = match err {
            DbError::NotFound { entity, id } => return ApiError::not_found(&entity, &id),
            DbError::Aggregation(core) => return ApiError::from(core),
            other => other,
        };

        tracing::error!(error = %err, "Database error");
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                ApiError::new(ErrorCode::ServiceUnavailable, "Database unavailable, try again")
            }
            DbError::TransactionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            _ => ApiError::new(ErrorCode::DatabaseError, "Database operation failed"),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            err @ CoreError::TotalMismatch { .. } => {
                ApiError::validation(err.to_string()).with_field("totalAmount")
            }
            err @ CoreError::AmountOverflow { .. } => {
                tracing::error!(error = %err, "Amount overflow");
                ApiError::new(ErrorCode::Internal, err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        ApiError::validation(err.to_string()).with_field(field)
    }
}

/// Malformed or non-JSON request bodies, including a wrongly typed `items`.
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

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use vapor_core::Money;

    #[test]
    fn test_validation_error_keeps_field() {
        let err = ApiError::from(ValidationError::Empty {
            field: "items".to_string(),
        });

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("items"));
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "items must not be empty");
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: bills".to_string()));
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("bills"));

        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("field").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DbError::not_found("Bill", "b1")).code.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DbError::PoolExhausted).code.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(CoreError::TotalMismatch {
                submitted: Money::from_major(100),
                expected: Money::from_major(105),
            })
            .code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            ApiError::from(DbError::ConnectionFailed("pool is closed".into())).code,
            ErrorCode::ServiceUnavailable
        );
    }

    #[test]
    fn test_aggregation_overflow_is_internal() {
        let err = ApiError::from(DbError::Aggregation(CoreError::AmountOverflow {
            what: "totalSales".to_string(),
        }));

        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "totalSales is too large to compute");
    }
}
