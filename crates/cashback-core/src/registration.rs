//! # Reseller Registration
//!
//! Validates a sign-up request before the user and reseller rows are created.
//!
//! ## Check Order
//! ```text
//! RegistrationRequest
//!      │
//!      ├── cpf blank?        → MissingField("CPF")
//!      ├── name blank?       → MissingField("name")
//!      ├── name too long?    → NameTooLong
//!      ├── cpf checksum bad? → InvalidCpf
//!      ├── email blank?      → MissingField("email")
//!      ├── email malformed?  → InvalidEmail
//!      ├── password short?   → WeakPassword
//!      │
//!      ▼
//! ValidRegistration { email (normalized), password, NewReseller }
//! ```
//!
//! Uniqueness of email and CPF is left to the database constraints.

use serde::Deserialize;

use crate::cpf::Cpf;
use crate::error::{RegistrationError, ValidationError};
use crate::types::NewReseller;
use crate::validation::{validate_email, validate_name, validate_password};

/// A sign-up request as received from the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub name: String,
}

/// A request that passed every check.
///
/// The password is still plaintext; hashing belongs to the service layer.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub reseller: NewReseller,
}

/// Validates a registration request.
///
/// ## Example
/// ```rust
/// use cashback_core::registration::{validate, RegistrationRequest};
/// use cashback_core::RegistrationError;
///
/// let request = RegistrationRequest {
///     email: "ana@Example.com".into(),
///     password: "s3cret-pass".into(),
///     cpf: "945.086.080-78".into(),
///     name: "Ana".into(),
/// };
/// let valid = validate(request.clone(), 8).unwrap();
/// assert_eq!(valid.email, "ana@example.com");
/// assert_eq!(valid.reseller.cpf.digits(), "94508608078");
///
/// let bad = RegistrationRequest { cpf: "111.111.111-11".into(), ..request };
/// assert_eq!(validate(bad, 8).unwrap_err(), RegistrationError::InvalidCpf);
/// ```
pub fn validate(
    request: RegistrationRequest,
    min_password_length: usize,
) -> Result<ValidRegistration, RegistrationError> {
    if request.cpf.trim().is_empty() {
        return Err(RegistrationError::missing("CPF"));
    }

    let name = validate_name(&request.name).map_err(|err| match err {
        ValidationError::TooLong { max, .. } => RegistrationError::NameTooLong { max },
        _ => RegistrationError::missing("name"),
    })?;

    let cpf = Cpf::parse(&request.cpf).map_err(|_| RegistrationError::InvalidCpf)?;

    let email = validate_email(&request.email).map_err(|err| match err {
        ValidationError::Required { .. } => RegistrationError::missing("email"),
        _ => RegistrationError::InvalidEmail {
            email: request.email.trim().to_string(),
        },
    })?;

    validate_password(&request.password, min_password_length).map_err(|err| match err {
        ValidationError::Required { .. } => RegistrationError::missing("password"),
        _ => RegistrationError::WeakPassword {
            min: min_password_length,
        },
    })?;

    Ok(ValidRegistration {
        email,
        password: request.password,
        reseller: NewReseller { cpf, name },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIN_PASSWORD_LENGTH;

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            email: "revenda@boticario.com".to_string(),
            password: "senha-forte".to_string(),
            cpf: "870.091.100-34".to_string(),
            name: "Maria".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let valid = validate(request(), MIN_PASSWORD_LENGTH).unwrap();
        assert_eq!(valid.email, "revenda@boticario.com");
        assert_eq!(valid.password, "senha-forte");
        assert_eq!(valid.reseller.name, "Maria");
        assert_eq!(valid.reseller.cpf.digits(), "87009110034");
    }

    #[test]
    fn test_missing_fields() {
        let err = validate(
            RegistrationRequest {
                cpf: "  ".to_string(),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(err, RegistrationError::missing("CPF"));

        let err = validate(
            RegistrationRequest {
                name: String::new(),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(err, RegistrationError::missing("name"));

        let err = validate(
            RegistrationRequest {
                email: String::new(),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(err, RegistrationError::missing("email"));
    }

    #[test]
    fn test_name_length_boundary() {
        let valid = validate(
            RegistrationRequest {
                name: "N".repeat(255),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap();
        assert_eq!(valid.reseller.name.len(), 255);

        let err = validate(
            RegistrationRequest {
                name: "N".repeat(256),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(err, RegistrationError::NameTooLong { max: 255 });
    }

    #[test]
    fn test_invalid_cpf_before_email() {
        let err = validate(
            RegistrationRequest {
                cpf: "870.091.100-35".to_string(),
                email: "broken".to_string(),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(err, RegistrationError::InvalidCpf);
    }

    #[test]
    fn test_invalid_email() {
        let err = validate(
            RegistrationRequest {
                email: " not-an-email ".to_string(),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::InvalidEmail {
                email: "not-an-email".to_string()
            }
        );
    }

    #[test]
    fn test_weak_password() {
        let err = validate(
            RegistrationRequest {
                password: "short".to_string(),
                ..request()
            },
            MIN_PASSWORD_LENGTH,
        )
        .unwrap_err();
        assert_eq!(err, RegistrationError::WeakPassword { min: 8 });
    }
}
