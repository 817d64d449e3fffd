//! # Store Collaborator
//!
//! The persistence operations the service needs, behind one trait so the
//! orchestration can run against SQLite or any other backend.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CashbackService<S: CashbackStore>                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  trait CashbackStore                                                   │
//! │       │                                                                 │
//! │       └── cashback_db::Database  (users / resellers / purchases repos) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use cashback_core::{Money, NewPurchase, NewReseller, NewUser, Period, Purchase, Reseller, User};
use cashback_db::{Database, DbResult};

/// Persistence operations used by [`CashbackService`](crate::CashbackService).
///
/// Unique constraint violations must surface as `DbError::UniqueViolation`
/// carrying the `table.column` name, so the service can translate them.
#[async_trait]
pub trait CashbackStore: Send + Sync {
    /// Sum of a reseller's purchase values within a period.
    async fn sum_purchase_values(&self, reseller_id: &str, period: Period) -> DbResult<Money>;

    /// The reseller owned by `user_id`, if any.
    async fn find_reseller_by_user(&self, user_id: &str) -> DbResult<Option<Reseller>>;

    /// Whether any purchase already uses `code`.
    async fn exists_purchase_with_code(&self, code: i64) -> DbResult<bool>;

    /// Inserts an admitted purchase.
    async fn create_purchase(&self, purchase: NewPurchase) -> DbResult<Purchase>;

    /// Creates a user and its reseller atomically.
    async fn create_user_and_reseller(
        &self,
        user: NewUser,
        reseller: NewReseller,
    ) -> DbResult<Reseller>;

    /// A reseller's purchases ordered by date then code, optionally in one period.
    async fn list_purchases(
        &self,
        reseller_id: &str,
        period: Option<Period>,
    ) -> DbResult<Vec<Purchase>>;

    async fn find_user(&self, user_id: &str) -> DbResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    async fn update_reseller_name(&self, user_id: &str, name: &str) -> DbResult<Reseller>;

    async fn update_user_password(&self, user_id: &str, password_hash: &str) -> DbResult<()>;
}

#[async_trait]
impl CashbackStore for Database {
    async fn sum_purchase_values(&self, reseller_id: &str, period: Period) -> DbResult<Money> {
        self.purchases().sum_for_period(reseller_id, period).await
    }

    async fn find_reseller_by_user(&self, user_id: &str) -> DbResult<Option<Reseller>> {
        self.resellers().find_by_user(user_id).await
    }

    async fn exists_purchase_with_code(&self, code: i64) -> DbResult<bool> {
        self.purchases().exists_code(code).await
    }

    async fn create_purchase(&self, purchase: NewPurchase) -> DbResult<Purchase> {
        self.purchases().insert(purchase).await
    }

    async fn create_user_and_reseller(
        &self,
        user: NewUser,
        reseller: NewReseller,
    ) -> DbResult<Reseller> {
        let (_, reseller) = self.resellers().create_with_user(user, reseller).await?;
        Ok(reseller)
    }

    async fn list_purchases(
        &self,
        reseller_id: &str,
        period: Option<Period>,
    ) -> DbResult<Vec<Purchase>> {
        self.purchases().list_for_reseller(reseller_id, period).await
    }

    async fn find_user(&self, user_id: &str) -> DbResult<Option<User>> {
        self.users().get_by_id(user_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.users().get_by_email(email).await
    }

    async fn update_reseller_name(&self, user_id: &str, name: &str) -> DbResult<Reseller> {
        self.resellers().update_name(user_id, name).await
    }

    async fn update_user_password(&self, user_id: &str, password_hash: &str) -> DbResult<()> {
        self.users().update_password(user_id, password_hash).await
    }
}
