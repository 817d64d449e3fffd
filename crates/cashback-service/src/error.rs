//! # Service Error Type
//!
//! Unified error type returned by every [`CashbackService`](crate::CashbackService)
//! operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cashback Service                   │
//! │                                                                         │
//! │  cashback-core                cashback-db                               │
//! │  ─────────────                ───────────                               │
//! │  AdmissionError ──┐           DbError::UniqueViolation("purchases.code")│
//! │  RegistrationError┤                    │                                │
//! │  ValidationError ─┤                    ▼ translated                     │
//! │                   │           AdmissionError::DuplicateCode             │
//! │                   ▼                    │                                │
//! │            ┌──────────────────────────────────┐                         │
//! │            │          ServiceError            │                         │
//! │            │  code()        → ErrorCode       │                         │
//! │            │  http_status() → 400/401/403/... │                         │
//! │            └──────────────────────────────────┘                         │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  HTTP adapter: { "code": "DUPLICATE_CODE", "message": "..." }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Raw constraint violations never reach the caller; they are mapped to the
//! domain error they stand for.

use serde::Serialize;
use thiserror::Error;

use cashback_core::{AdmissionError, RegistrationError, ValidationError};
use cashback_db::DbError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Purchase admission refused.
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// Registration refused.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Malformed input (bad period, blank name, short password, ...).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller has no reseller, or a referenced entity is gone.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unknown email, inactive user or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Attempt to change an attribute that is fixed after creation.
    #[error("The {field} cannot be changed")]
    ImmutableField { field: String },

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Storage failure not covered by a domain error.
    #[error("Database error: {0}")]
    Database(DbError),

    /// Anything else (e.g. a panicked blocking task).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Purchase value not positive (400)
    InvalidValue,

    /// Purchase code taken (400)
    DuplicateCode,

    /// Required registration field missing (400)
    MissingField,

    /// CPF checksum failed (400)
    InvalidCpf,

    /// Email malformed (400)
    InvalidEmail,

    /// Password too short (400)
    WeakPassword,

    /// Reseller name too long (400)
    InvalidName,

    /// Email already registered (400)
    DuplicateEmail,

    /// CPF already registered (400)
    DuplicateCpf,

    /// Attempt to change cpf / email (400)
    ImmutableField,

    /// Generic input validation failure (400)
    ValidationError,

    /// Bad login (401)
    InvalidCredentials,

    /// Caller does not own the reseller (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ServiceError {
    /// Creates a not found error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        ServiceError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Creates an immutable field error.
    pub fn immutable(field: &str) -> Self {
        ServiceError::ImmutableField {
            field: field.to_string(),
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Admission(err) => match err {
                AdmissionError::InvalidValue => ErrorCode::InvalidValue,
                AdmissionError::NotFound { .. } => ErrorCode::NotFound,
                AdmissionError::Forbidden { .. } => ErrorCode::Forbidden,
                AdmissionError::DuplicateCode { .. } => ErrorCode::DuplicateCode,
            },
            ServiceError::Registration(err) => match err {
                RegistrationError::MissingField { .. } => ErrorCode::MissingField,
                RegistrationError::NameTooLong { .. } => ErrorCode::InvalidName,
                RegistrationError::InvalidCpf => ErrorCode::InvalidCpf,
                RegistrationError::InvalidEmail { .. } => ErrorCode::InvalidEmail,
                RegistrationError::WeakPassword { .. } => ErrorCode::WeakPassword,
                RegistrationError::DuplicateEmail { .. } => ErrorCode::DuplicateEmail,
                RegistrationError::DuplicateCpf { .. } => ErrorCode::DuplicateCpf,
            },
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::NotFound { .. } => ErrorCode::NotFound,
            ServiceError::InvalidCredentials => ErrorCode::InvalidCredentials,
            ServiceError::ImmutableField { .. } => ErrorCode::ImmutableField,
            ServiceError::Database(_) => ErrorCode::DatabaseError,
            ServiceError::Hashing(_) | ServiceError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// HTTP status an adapter should answer with.
    ///
    /// ## Mapping
    /// ```text
    /// validation-class (value, code, cpf, email, ...)  → 400
    /// InvalidCredentials                               → 401
    /// Forbidden                                        → 403
    /// NotFound                                         → 404
    /// Database / Hashing / Internal                    → 500
    /// ```
    pub fn http_status(&self) -> u16 {
        match self.code() {
            ErrorCode::InvalidCredentials => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::DatabaseError | ErrorCode::Internal => 500,
            _ => 400,
        }
    }
}

/// Translates storage errors into domain errors.
///
/// ## Constraint Mapping
/// ```text
/// UNIQUE purchases.code  → AdmissionError::DuplicateCode
/// UNIQUE users.email     → RegistrationError::DuplicateEmail
/// UNIQUE resellers.cpf   → RegistrationError::DuplicateCpf
/// NotFound               → ServiceError::NotFound
/// anything else          → ServiceError::Database
/// ```
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { field, value } => match field.as_str() {
                "purchases.code" => match value.parse() {
                    Ok(code) => AdmissionError::DuplicateCode { code }.into(),
                    Err(_) => ServiceError::Database(DbError::UniqueViolation { field, value }),
                },
                "users.email" => RegistrationError::DuplicateEmail { email: value }.into(),
                "resellers.cpf" => RegistrationError::DuplicateCpf { cpf: value }.into(),
                _ => ServiceError::Database(DbError::UniqueViolation { field, value }),
            },
            DbError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            other => ServiceError::Database(other),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Error Body
// =============================================================================

/// Serializable error body for adapters.
///
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "You do not have permission to register purchases for reseller ..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        // Internal details stay in the logs
        let message = match err.code() {
            ErrorCode::DatabaseError | ErrorCode::Internal => {
                "An internal error occurred".to_string()
            }
            _ => err.to_string(),
        };

        ErrorBody {
            code: err.code(),
            message,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ServiceError, u16)> = vec![
            (AdmissionError::InvalidValue.into(), 400),
            (AdmissionError::DuplicateCode { code: 1 }.into(), 400),
            (
                AdmissionError::Forbidden {
                    reseller_id: "r".to_string(),
                }
                .into(),
                403,
            ),
            (
                AdmissionError::NotFound {
                    reseller_id: "r".to_string(),
                }
                .into(),
                404,
            ),
            (RegistrationError::InvalidCpf.into(), 400),
            (ServiceError::InvalidCredentials, 401),
            (ServiceError::immutable("cpf"), 400),
            (ServiceError::not_found("Reseller", "u"), 404),
            (ServiceError::Database(DbError::PoolExhausted), 500),
            (ServiceError::Hashing("boom".to_string()), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.http_status(), status, "{err:?}");
        }
    }

    #[test]
    fn test_unique_violations_translated() {
        let err: ServiceError = DbError::duplicate("purchases.code", "42").into();
        assert!(matches!(
            err,
            ServiceError::Admission(AdmissionError::DuplicateCode { code: 42 })
        ));

        let err: ServiceError = DbError::duplicate("users.email", "a@b.com").into();
        assert_eq!(err.code(), ErrorCode::DuplicateEmail);

        let err: ServiceError = DbError::duplicate("resellers.cpf", "94508608078").into();
        assert_eq!(err.code(), ErrorCode::DuplicateCpf);

        let err: ServiceError = DbError::duplicate("other.column", "x").into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn test_error_body_hides_internals() {
        let err = ServiceError::Database(DbError::QueryFailed("no such table: x".to_string()));
        let body = ErrorBody::from(&err);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "DATABASE_ERROR");
        assert_eq!(json["message"], "An internal error occurred");

        let body = ErrorBody::from(&ServiceError::from(AdmissionError::InvalidValue));
        assert_eq!(body.message, "Purchase value must be greater than 0!");
    }
}
