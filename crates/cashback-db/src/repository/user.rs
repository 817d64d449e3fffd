//! # User Repository
//!
//! Login accounts. Users are created together with their reseller (see
//! [`ResellerRepository::create_with_user`](super::reseller::ResellerRepository::create_with_user));
//! this repository covers lookups and account maintenance.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cashback_core::User;

/// Row shape of the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRecord {
    id: String,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            password_hash: record.password_hash,
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, is_active, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    /// Gets a user by (already normalized) email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, is_active, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    /// Replaces a user's password hash.
    pub async fn update_password(&self, id: &str, password_hash: &str) -> DbResult<()> {
        debug!(user_id = %id, "Updating password hash");

        let result = sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Activates or deactivates a user. Inactive users cannot log in.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(user_id = %id, active, "Setting user active flag");

        let result = sqlx::query("UPDATE users SET is_active = ?1 WHERE id = ?2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Deletes a user. Its reseller and purchases go with it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(user_id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use cashback_core::{Cpf, NewReseller, NewUser};

    async fn db_with_user() -> (Database, User) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (user, _) = db
            .resellers()
            .create_with_user(
                NewUser {
                    email: "ana@example.com".to_string(),
                    password_hash: "old-hash".to_string(),
                },
                NewReseller {
                    cpf: Cpf::parse("945.086.080-78").unwrap(),
                    name: "Ana".to_string(),
                },
            )
            .await
            .unwrap();
        (db, user)
    }

    #[tokio::test]
    async fn test_lookups() {
        let (db, user) = db_with_user().await;

        let by_id = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ana@example.com");
        assert_eq!(by_id.password_hash, "old-hash");
        assert!(by_id.is_active);

        let by_email = db.users().get_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(db.users().get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_password_and_active_flag() {
        let (db, user) = db_with_user().await;

        db.users().update_password(&user.id, "new-hash").await.unwrap();
        db.users().set_active(&user.id, false).await.unwrap();

        let reloaded = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");
        assert!(!reloaded.is_active);

        let err = db.users().update_password("ghost", "x").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
