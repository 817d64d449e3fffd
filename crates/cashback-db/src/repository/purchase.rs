//! # Purchase Repository
//!
//! Database operations for purchases and monthly totals.
//!
//! ## Monthly Total Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sum_for_period(reseller, 2021-10)                                      │
//! │                                                                         │
//! │  SELECT COALESCE(SUM(value_cents), 0)                                   │
//! │  FROM purchases                                                         │
//! │  WHERE reseller_id = ?  AND date >= '2021-10-01'                        │
//! │                         AND date <  '2021-11-01'                        │
//! │                                                                         │
//! │  Served by idx_purchases_reseller_date. Every status counts.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cashback_core::{Money, NewPurchase, Period, Purchase, PurchaseStatus};

/// Row shape of the `purchases` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PurchaseRecord {
    id: String,
    code: i64,
    value_cents: i64,
    date: NaiveDate,
    reseller_id: String,
    status: PurchaseStatus,
    created_at: DateTime<Utc>,
}

impl From<PurchaseRecord> for Purchase {
    fn from(record: PurchaseRecord) -> Self {
        Purchase {
            id: record.id,
            code: record.code,
            value: Money::from_cents(record.value_cents),
            date: record.date,
            reseller_id: record.reseller_id,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// Repository for purchase database operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Inserts an admitted purchase.
    ///
    /// ## Errors
    /// - `UniqueViolation { field: "purchases.code" }` when the code is taken,
    ///   even if an earlier `exists_code` check said otherwise
    /// - `ForeignKeyViolation` when the reseller does not exist
    pub async fn insert(&self, purchase: NewPurchase) -> DbResult<Purchase> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, code = purchase.code, reseller_id = %purchase.reseller_id, "Inserting purchase");

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, code, value_cents, date, reseller_id, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(purchase.code)
        .bind(purchase.value.cents())
        .bind(purchase.date)
        .bind(&purchase.reseller_id)
        .bind(purchase.status)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(purchase.code.to_string()))?;

        Ok(Purchase {
            id,
            code: purchase.code,
            value: purchase.value,
            date: purchase.date,
            reseller_id: purchase.reseller_id,
            status: purchase.status,
            created_at: now,
        })
    }

    /// True when any purchase already uses `code`.
    pub async fn exists_code(&self, code: i64) -> DbResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM purchases WHERE code = ?1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Sum of every purchase value of a reseller within a period.
    ///
    /// Zero when the reseller has no purchases that month.
    pub async fn sum_for_period(&self, reseller_id: &str, period: Period) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(value_cents), 0)
            FROM purchases
            WHERE reseller_id = ?1
              AND date >= ?2
              AND date < ?3
            "#,
        )
        .bind(reseller_id)
        .bind(period.first_day())
        .bind(period.end())
        .fetch_one(&self.pool)
        .await?;

        debug!(reseller_id = %reseller_id, period = %period, cents, "Monthly total");

        Ok(Money::from_cents(cents))
    }

    /// Lists a reseller's purchases, optionally restricted to one period.
    ///
    /// Ordered by date, then code, so repeated listings are identical.
    pub async fn list_for_reseller(
        &self,
        reseller_id: &str,
        period: Option<Period>,
    ) -> DbResult<Vec<Purchase>> {
        let records = match period {
            Some(period) => {
                sqlx::query_as::<_, PurchaseRecord>(
                    r#"
                    SELECT id, code, value_cents, date, reseller_id, status, created_at
                    FROM purchases
                    WHERE reseller_id = ?1
                      AND date >= ?2
                      AND date < ?3
                    ORDER BY date, code
                    "#,
                )
                .bind(reseller_id)
                .bind(period.first_day())
                .bind(period.end())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PurchaseRecord>(
                    r#"
                    SELECT id, code, value_cents, date, reseller_id, status, created_at
                    FROM purchases
                    WHERE reseller_id = ?1
                    ORDER BY date, code
                    "#,
                )
                .bind(reseller_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records.into_iter().map(Purchase::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
