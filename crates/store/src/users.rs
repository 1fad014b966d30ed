//! User repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use souk_auth::{NewUser, Role, User};
use souk_core::UserId;

use crate::error::{StoreError, StoreResult};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| StoreError::Query(format!("unknown role in users.role: {}", self.role)))?;
        Ok(User {
            id: UserId::from_i64(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for account rows.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        UserStore { pool }
    }

    /// Insert a new account.
    ///
    /// Fails with [`StoreError::UniqueViolation`] when the email is already
    /// registered.
    pub async fn insert(&self, new: NewUser) -> StoreResult<User> {
        debug!(email = %new.email, role = %new.role, "inserting user");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: UserId::from_i64(result.last_insert_rowid()),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    pub async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let created = users
            .insert(new_user("alice@example.com", Role::Merchant))
            .await
            .unwrap();
        assert!(created.id.as_i64() > 0);

        let found = users.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::Merchant);

        let by_id = users.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users
            .insert(new_user("bob@example.com", Role::Customer))
            .await
            .unwrap();

        let err = users
            .insert(new_user("bob@example.com", Role::Merchant))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        assert!(db.users().find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
