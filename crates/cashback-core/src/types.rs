//! # Domain Types
//!
//! Core domain types used throughout the cashback program.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐ 1:1 ┌─────────────────┐ 1:N ┌─────────────────┐   │
//! │  │      User       │────►│    Reseller     │────►│    Purchase     │   │
//! │  │  ─────────────  │     │  ─────────────  │     │  ─────────────  │   │
//! │  │  id (UUID)      │     │  user_id (PK)   │     │  id (UUID)      │   │
//! │  │  email (unique) │     │  cpf (unique)   │     │  code (unique)  │   │
//! │  │  password_hash  │     │  name           │     │  value_cents    │   │
//! │  └─────────────────┘     └─────────────────┘     │  date, status   │   │
//! │                                                   └────────┬────────┘   │
//! │                                                            │ + cashback │
//! │                                                   ┌────────▼────────┐   │
//! │                                                   │  PurchaseView   │   │
//! │                                                   │  (never stored) │   │
//! │                                                   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A reseller is keyed by its owning user's id. The id a client declares as
//! "reseller" on a purchase is therefore a user id, and ownership is a plain
//! equality check against the caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cashback::Cashback;
use crate::cpf::Cpf;
use crate::money::Money;

// =============================================================================
// Identity
// =============================================================================

/// The authenticated caller, as resolved by the request context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Identity {
            user_id: user_id.into(),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A login account. Every reseller owns exactly one.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Normalized email, unique.
    pub email: String,

    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Inactive users cannot authenticate.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted (password already hashed).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

// =============================================================================
// Reseller
// =============================================================================

/// A reseller account, entitled to register purchases and earn cashback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reseller {
    /// Owning user's id; also the reseller's primary key. Immutable.
    pub user_id: String,

    /// Tax id. Immutable after creation.
    pub cpf: Cpf,

    /// Display name. The only mutable attribute.
    pub name: String,
}

/// Reseller attributes validated at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReseller {
    pub cpf: Cpf,
    pub name: String,
}

/// Profile changes requested by a reseller.
///
/// `cpf` exists only so that an attempt to change it can be refused
/// explicitly instead of being silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Account changes requested by a user. `email` is refused like `cpf` above.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// =============================================================================
// Purchase Status
// =============================================================================

/// Validation state of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Waiting for manual validation.
    #[default]
    PendingValidation,
    /// Validated; counts as a confirmed sale.
    Approved,
    /// Refused during validation.
    Rejected,
}

impl PurchaseStatus {
    /// Label shown to resellers.
    ///
    /// ```rust
    /// use cashback_core::PurchaseStatus;
    ///
    /// assert_eq!(PurchaseStatus::PendingValidation.label(), "Em validação");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            PurchaseStatus::PendingValidation => "Em validação",
            PurchaseStatus::Approved => "Aprovado",
            PurchaseStatus::Rejected => "Não aprovado",
        }
    }

    /// Numeric code used by older clients (1, 2, 3).
    pub fn code(&self) -> u8 {
        match self {
            PurchaseStatus::PendingValidation => 1,
            PurchaseStatus::Approved => 2,
            PurchaseStatus::Rejected => 3,
        }
    }

    /// Inverse of [`PurchaseStatus::code`].
    pub fn from_code(code: u8) -> Option<PurchaseStatus> {
        match code {
            1 => Some(PurchaseStatus::PendingValidation),
            2 => Some(PurchaseStatus::Approved),
            3 => Some(PurchaseStatus::Rejected),
            _ => None,
        }
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A stored purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Purchase {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code supplied by the reseller, unique across all purchases.
    pub code: i64,

    /// Purchase value. Always positive; serialized in reais.
    #[serde(serialize_with = "crate::money::decimal::serialize")]
    pub value: Money,

    pub date: NaiveDate,

    /// Owning reseller (its user id). Immutable.
    pub reseller_id: String,

    pub status: PurchaseStatus,

    pub created_at: DateTime<Utc>,
}

/// An admitted purchase ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub code: i64,
    pub value: Money,
    pub date: NaiveDate,
    pub reseller_id: String,
    pub status: PurchaseStatus,
}

// =============================================================================
// Purchase View
// =============================================================================

/// A purchase plus the fields derived at read time.
///
/// Cashback reflects the reseller's monthly total *when the view is built*,
/// not when the purchase was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseView {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub cashback_percent: u8,
    #[serde(serialize_with = "crate::money::decimal::serialize")]
    pub cashback_value: Money,
    pub status_label: &'static str,
}

impl PurchaseView {
    /// Builds a view from a purchase and the total of its month.
    pub fn new(purchase: Purchase, monthly_total: Money) -> Self {
        let cashback = Cashback::for_purchase(purchase.value, monthly_total);
        let status_label = purchase.status.label();
        PurchaseView {
            purchase,
            cashback_percent: cashback.percent,
            cashback_value: cashback.value,
            status_label,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
