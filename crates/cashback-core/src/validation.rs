//! # Validation Module
//!
//! Field validators shared by registration and profile updates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP adapter                                                  │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: cashback-core                                                 │
//! │  ├── THIS MODULE: name, email, password shape                          │
//! │  └── cpf / admission / registration: business rules                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE email, cpf, purchase code                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashback_core::validation::{validate_email, validate_name};
//!
//! assert_eq!(validate_name("  Maria Souza ").unwrap(), "Maria Souza");
//! assert_eq!(validate_email("Ana@Example.COM").unwrap(), "Ana@example.com");
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted reseller name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Longest accepted email, in bytes.
pub const MAX_EMAIL_LENGTH: usize = 255;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a reseller display name.
///
/// ## Rules
/// - Must not be blank
/// - At most 255 characters after trimming
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates and normalizes an email address.
///
/// ## Rules
/// - Must not be blank
/// - Exactly one `@`, with a non-empty local part and a dotted domain
/// - No whitespace
///
/// ## Normalization
/// Surrounding whitespace is trimmed and the domain part is lowercased.
/// The local part keeps its case, since mail servers may treat it as
/// case-sensitive.
///
/// ## Example
/// ```rust
/// use cashback_core::validation::validate_email;
///
/// assert_eq!(validate_email(" joao@Mail.com ").unwrap(), "joao@mail.com");
/// assert!(validate_email("joao").is_err());
/// assert!(validate_email("joao@mail").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain"));
    }

    // Domain needs at least one dot with labels on both sides
    let labels_ok = domain.split('.').all(|label| !label.is_empty());
    if !domain.contains('.') || !labels_ok {
        return Err(invalid("domain must look like example.com"));
    }

    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

/// Validates a new password.
///
/// Only length is checked; the password is hashed right after.
pub fn validate_password(password: &str, min: usize) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
