//! # Error Types
//!
//! Domain-specific error types for cashback-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashback-core errors (this file)                                      │
//! │  ├── AdmissionError    - Purchase admission failures                   │
//! │  ├── RegistrationError - Reseller registration failures                │
//! │  └── ValidationError   - Field-level input failures                    │
//! │                                                                         │
//! │  cashback-db errors (separate crate)                                   │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  cashback-service errors                                               │
//! │  └── ServiceError      - What the HTTP adapter maps to status codes    │
//! │                                                                         │
//! │  Flow: ValidationError → Admission/RegistrationError → ServiceError    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, field, reseller id)
//! 3. Authorization failures are never folded into validation failures

use thiserror::Error;

// =============================================================================
// Admission Error
// =============================================================================

/// Reasons a purchase submission is refused.
///
/// Variants are listed in the order admission checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Purchase value is zero or negative.
    #[error("Purchase value must be greater than 0!")]
    InvalidValue,

    /// The declared reseller does not exist.
    #[error("Reseller not found: {reseller_id}")]
    NotFound { reseller_id: String },

    /// The declared reseller belongs to someone else.
    ///
    /// ## User Workflow
    /// ```text
    /// Caller A submits { reseller: B, ... }
    ///      │
    ///      ▼
    /// reseller B.user_id != A
    ///      │
    ///      ▼
    /// Forbidden → surfaced as 403, not 400
    /// ```
    #[error("You do not have permission to register purchases for reseller {reseller_id}")]
    Forbidden { reseller_id: String },

    /// Another purchase already uses this code.
    #[error("Purchase code {code} already exists")]
    DuplicateCode { code: i64 },
}

impl AdmissionError {
    /// True for the authorization failure, false for validation failures.
    pub fn is_authorization(&self) -> bool {
        matches!(self, AdmissionError::Forbidden { .. })
    }
}

// =============================================================================
// Registration Error
// =============================================================================

/// Reasons a reseller registration is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A required field is missing or blank.
    #[error("You must provide a {field}!")]
    MissingField { field: String },

    /// Name exceeds the maximum length.
    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },

    /// CPF failed the checksum (or length / repeated digit) rules.
    #[error("You must provide a valid CPF!")]
    InvalidCpf,

    /// Email is not shaped like `local@domain`.
    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    /// Password shorter than the minimum length.
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Email already registered.
    #[error("A user with email '{email}' already exists")]
    DuplicateEmail { email: String },

    /// CPF already registered to another reseller.
    #[error("A reseller with CPF {cpf} already exists")]
    DuplicateCpf { cpf: String },
}

impl RegistrationError {
    pub(crate) fn missing(field: &str) -> Self {
        RegistrationError::MissingField {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad CPF, unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_error_messages() {
        assert_eq!(
            AdmissionError::InvalidValue.to_string(),
            "Purchase value must be greater than 0!"
        );
        let err = AdmissionError::DuplicateCode { code: 42 };
        assert_eq!(err.to_string(), "Purchase code 42 already exists");
    }

    #[test]
    fn test_forbidden_is_authorization() {
        let forbidden = AdmissionError::Forbidden {
            reseller_id: "r-1".to_string(),
        };
        assert!(forbidden.is_authorization());
        assert!(!AdmissionError::InvalidValue.is_authorization());
        assert!(!AdmissionError::DuplicateCode { code: 1 }.is_authorization());
    }

    #[test]
    fn test_registration_error_messages() {
        assert_eq!(
            RegistrationError::missing("CPF").to_string(),
            "You must provide a CPF!"
        );
        assert_eq!(
            RegistrationError::InvalidCpf.to_string(),
            "You must provide a valid CPF!"
        );
    }
}
