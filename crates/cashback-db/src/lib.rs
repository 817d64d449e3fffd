//! # cashback-db: Database Layer for the Reseller Cashback Program
//!
//! SQLite persistence for users, resellers and purchases, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashback Data Flow                               │
//! │                                                                         │
//! │  CashbackService::admit_purchase                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cashback-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo       │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ResellerRepo   │   │ 001_initial  │  │   │
//! │  │   │               │    │ PurchaseRepo   │   │  _schema.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (CASHBACK_DATABASE_PATH) or :memory: in tests             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashback_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./cashback.db")).await?;
//! let taken = db.purchases().exists_code(42).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::purchase::PurchaseRepository;
pub use repository::reseller::ResellerRepository;
pub use repository::user::UserRepository;
