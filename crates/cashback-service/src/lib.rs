//! # cashback-service: Orchestration for the Reseller Cashback Program
//!
//! Composes the pure rules of `cashback-core` with the SQLite store of
//! `cashback-db`. An HTTP adapter only needs to authenticate the caller,
//! build an [`Identity`](cashback_core::Identity) and call into
//! [`CashbackService`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP adapter (out of tree)                                             │
//! │       │  Identity + request body                                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                cashback-service (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ServiceConfig ──► CashbackPolicy ──► CashbackService<S>      │   │
//! │  │                                              │                  │   │
//! │  │   password (argon2)    ServiceError ◄────────┤                  │   │
//! │  │                                              ▼                  │   │
//! │  │                                   trait CashbackStore           │   │
//! │  └──────────────────────────────────────────────┬──────────────────┘   │
//! │                                                 ▼                       │
//! │  cashback-core (rules)              cashback-db (SQLite, migrations)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashback_db::Database;
//! use cashback_service::{CashbackService, ServiceConfig};
//!
//! cashback_service::telemetry::init_tracing();
//! let config = ServiceConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//! let service = CashbackService::new(db, config.policy());
//!
//! let views = service.list_purchases(&caller, Some("2021"), Some("10")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod store;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, ServiceConfig};
pub use error::{ErrorBody, ErrorCode, ServiceError, ServiceResult};
pub use service::CashbackService;
pub use store::CashbackStore;

// Pure helpers adapters commonly need
pub use cashback_core::cashback::tier_percent;
pub use cashback_core::is_valid_cpf;
