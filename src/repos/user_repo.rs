/*
 * Responsibility
 * - UserRepository: the storage contract the service depends on
 * - PgUserRepo: SQLx implementation over the `users` table
 * - not-found / unique violation are returned as RepoError variants, not as generic errors
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{NewUser, User, user::DEFAULT_ROLE};
use crate::repos::error::{RepoError, RepoResult};

/// CRUD storage for users.
///
/// Implementations must report a missing row as `RepoError::NotFound` and a
/// duplicate email as `RepoError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the storage-assigned id.
    async fn create(&self, user: &NewUser) -> RepoResult<String>;

    async fn get_by_id(&self, id: &str) -> RepoResult<User>;

    async fn get_by_email(&self, email: &str) -> RepoResult<User>;

    /// Overwrites name / email / avatar of `user.id`.
    async fn update(&self, user: &User) -> RepoResult<()>;

    async fn delete(&self, id: &str) -> RepoResult<()>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    avatar: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            email: row.email,
            avatar: row.avatar,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// A string that is not a UUID cannot name any row.
fn parse_id(id: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| RepoError::NotFound)
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepo {
    async fn create(&self, user: &NewUser) -> RepoResult<String> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, avatar, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.avatar.as_deref())
        .bind(DEFAULT_ROLE)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(id.to_string())
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<User> {
        let id = parse_id(id)?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, avatar, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(User::from).ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, avatar, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(User::from).ok_or(RepoError::NotFound)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let id = parse_id(&user.id)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                name = $2,
                email = $3,
                avatar = $4,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.avatar.as_deref())
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        let id = parse_id(id)?;

        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
