//! # Repository Module
//!
//! Database repositories for the cashback schema.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CashbackService (cashback-service)                                    │
//! │       │                                                                 │
//! │       │  db.purchases().sum_for_period(&reseller_id, period)           │
//! │       ▼                                                                 │
//! │  PurchaseRepository                                                    │
//! │  ├── insert(&self, purchase)                                           │
//! │  ├── exists_code(&self, code)                                          │
//! │  ├── sum_for_period(&self, reseller_id, period)                        │
//! │  └── list_for_reseller(&self, reseller_id, period)                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository owns a clone of the pool and maps rows through a private
//! `sqlx::FromRow` record into the core domain type.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Account lookups and maintenance
//! - [`ResellerRepository`](reseller::ResellerRepository) - Registration transaction, profile
//! - [`PurchaseRepository`](purchase::PurchaseRepository) - Purchases and monthly totals

pub mod purchase;
pub mod reseller;
pub mod user;
