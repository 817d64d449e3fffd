//! # Reseller Repository
//!
//! Database operations for resellers.
//!
//! ## Registration Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_with_user(NewUser, NewReseller)                                 │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO users      ── UNIQUE(email) fails? ──► rollback          │
//! │    INSERT INTO resellers  ── UNIQUE(cpf) fails?   ──► rollback          │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either both rows exist afterwards, or neither does.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cashback_core::{Cpf, NewReseller, NewUser, Reseller, User};

/// Row shape of the `resellers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ResellerRecord {
    user_id: String,
    cpf: String,
    name: String,
}

impl TryFrom<ResellerRecord> for Reseller {
    type Error = DbError;

    fn try_from(record: ResellerRecord) -> Result<Self, Self::Error> {
        // Rows are only written from validated Cpf values
        let cpf = Cpf::parse(&record.cpf).map_err(|e| {
            DbError::Internal(format!("reseller {} has a corrupt CPF: {e}", record.user_id))
        })?;

        Ok(Reseller {
            user_id: record.user_id,
            cpf,
            name: record.name,
        })
    }
}

/// Repository for reseller database operations.
#[derive(Debug, Clone)]
pub struct ResellerRepository {
    pool: SqlitePool,
}

impl ResellerRepository {
    /// Creates a new ResellerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ResellerRepository { pool }
    }

    /// Creates a user and its reseller in one transaction.
    ///
    /// ## Errors
    /// - `UniqueViolation { field: "users.email" }` - email taken
    /// - `UniqueViolation { field: "resellers.cpf" }` - CPF taken
    ///
    /// Nothing is written when either insert fails.
    pub async fn create_with_user(
        &self,
        user: NewUser,
        reseller: NewReseller,
    ) -> DbResult<(User, Reseller)> {
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(user_id = %user_id, "Creating user and reseller");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, is_active, created_at)
            VALUES (?1, ?2, ?3, 1, ?4)
            "#,
        )
        .bind(&user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(user.email.as_str()))?;

        sqlx::query(
            r#"
            INSERT INTO resellers (user_id, cpf, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&user_id)
        .bind(reseller.cpf.digits())
        .bind(&reseller.name)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(reseller.cpf.digits()))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(user_id = %user_id, "Reseller registered");

        let created_user = User {
            id: user_id.clone(),
            email: user.email,
            password_hash: user.password_hash,
            is_active: true,
            created_at: now,
        };
        let created_reseller = Reseller {
            user_id,
            cpf: reseller.cpf,
            name: reseller.name,
        };

        Ok((created_user, created_reseller))
    }

    /// Gets the reseller owned by a user.
    pub async fn find_by_user(&self, user_id: &str) -> DbResult<Option<Reseller>> {
        let record = sqlx::query_as::<_, ResellerRecord>(
            r#"
            SELECT user_id, cpf, name
            FROM resellers
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Reseller::try_from).transpose()
    }

    /// Renames a reseller. The name is the only mutable attribute.
    pub async fn update_name(&self, user_id: &str, name: &str) -> DbResult<Reseller> {
        debug!(user_id = %user_id, "Updating reseller name");

        let record = sqlx::query_as::<_, ResellerRecord>(
            r#"
            UPDATE resellers
            SET name = ?1
            WHERE user_id = ?2
            RETURNING user_id, cpf, name
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Reseller::try_from(record),
            None => Err(DbError::not_found("Reseller", user_id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
        }
    }

    fn new_reseller(cpf: &str, name: &str) -> NewReseller {
        NewReseller {
            cpf: Cpf::parse(cpf).unwrap(),
            name: name.to_string(),
        }
    }

    async fn count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = db().await;
        let (user, reseller) = db
            .resellers()
            .create_with_user(new_user("ana@example.com"), new_reseller("945.086.080-78", "Ana"))
            .await
            .unwrap();

        assert_eq!(user.id, reseller.user_id);
        assert!(user.is_active);

        let found = db.resellers().find_by_user(&user.id).await.unwrap().unwrap();
        assert_eq!(found, reseller);
        assert_eq!(found.cpf.digits(), "94508608078");

        assert!(db.resellers().find_by_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rolls_back() {
        let db = db().await;
        db.resellers()
            .create_with_user(new_user("ana@example.com"), new_reseller("945.086.080-78", "Ana"))
            .await
            .unwrap();

        let err = db
            .resellers()
            .create_with_user(new_user("ana@example.com"), new_reseller("870.091.100-34", "Bia"))
            .await
            .unwrap_err();

        assert_eq!(err.unique_field(), Some("users.email"));
        assert_eq!(count(&db, "users").await, 1);
        assert_eq!(count(&db, "resellers").await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_cpf_leaves_no_user() {
        let db = db().await;
        db.resellers()
            .create_with_user(new_user("ana@example.com"), new_reseller("945.086.080-78", "Ana"))
            .await
            .unwrap();

        let err = db
            .resellers()
            .create_with_user(new_user("bia@example.com"), new_reseller("945.086.080-78", "Bia"))
            .await
            .unwrap_err();

        assert_eq!(err.unique_field(), Some("resellers.cpf"));
        // The user insert of the failed registration must not survive
        assert_eq!(count(&db, "users").await, 1);
        assert!(db
            .users()
            .get_by_email("bia@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_name() {
        let db = db().await;
        let (user, _) = db
            .resellers()
            .create_with_user(new_user("ana@example.com"), new_reseller("945.086.080-78", "Ana"))
            .await
            .unwrap();

        let renamed = db.resellers().update_name(&user.id, "Ana Paula").await.unwrap();
        assert_eq!(renamed.name, "Ana Paula");
        assert_eq!(renamed.cpf.digits(), "94508608078");

        let err = db.resellers().update_name("ghost", "X").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
