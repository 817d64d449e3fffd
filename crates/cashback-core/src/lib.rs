//! # cashback-core: Pure Business Logic for Reseller Cashback
//!
//! This crate is the **heart** of the cashback program. It contains every
//! business rule as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Reseller Cashback Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               HTTP adapter (outside this workspace)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cashback-service (orchestration)                │   │
//! │  │    admit_purchase, list_purchases, register_reseller, ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cashback-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────────┐  │   │
//! │  │   │   cpf   │ │ cashback │ │ admission │ │   registration   │  │   │
//! │  │   │checksum │ │  tiers   │ │  status   │ │ user + reseller  │  │   │
//! │  │   └─────────┘ └──────────┘ └───────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  cashback-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cpf`] - CPF checksum validation and the `Cpf` newtype
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`period`] - Calendar month used for aggregates and listing filters
//! - [`cashback`] - Monthly tier engine
//! - [`admission`] - Purchase admission rules
//! - [`registration`] - Reseller registration rules
//! - [`types`] - Domain entities (User, Reseller, Purchase, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators
//!
//! ## Example Usage
//!
//! ```rust
//! use cashback_core::cashback::{cashback_value, tier_percent};
//! use cashback_core::cpf::is_valid_cpf;
//! use cashback_core::money::Money;
//!
//! assert!(is_valid_cpf("945.086.080-78"));
//!
//! // Monthly total of R$1000.01 lands in the 15% tier
//! let percent = tier_percent(Money::from_cents(100_001));
//! assert_eq!(percent, 15);
//!
//! let cashback = cashback_value(Money::from_cents(20_000), percent);
//! assert_eq!(cashback.cents(), 3_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admission;
pub mod cashback;
pub mod cpf;
pub mod error;
pub mod money;
pub mod period;
pub mod registration;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use admission::{CashbackPolicy, PurchaseSubmission};
pub use cashback::Cashback;
pub use cpf::{is_valid_cpf, Cpf};
pub use error::{AdmissionError, RegistrationError, ValidationError};
pub use money::Money;
pub use period::Period;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// CPF whose purchases are approved on admission instead of waiting for
/// manual validation.
///
/// Hardcoded special case inherited from the program's first release. It is
/// only the *default* of [`CashbackPolicy`]; deployments override it through
/// configuration.
pub const DEFAULT_AUTO_APPROVED_CPF: &str = "15350946056";

/// Year used when a listing request does not name a full period.
///
/// This is a fixed calendar month, not "the current month". Kept as the
/// default for compatibility; see [`period::Period::from_query`].
pub const DEFAULT_LISTING_YEAR: i32 = 2021;

/// Month paired with [`DEFAULT_LISTING_YEAR`].
pub const DEFAULT_LISTING_MONTH: u32 = 8;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;
