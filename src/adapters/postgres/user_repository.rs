//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::UserProfile;
use crate::ports::UserRepository;

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, image_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch user", e))?;

        row.map(row_to_user).transpose()
    }

    async fn upsert(&self, user: &UserProfile) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email())
        .bind(user.name())
        .bind(user.image_url())
        .bind(user.created_at().as_datetime())
        .bind(user.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to upsert user", e))?;

        Ok(())
    }

    async fn insert_if_absent(&self, user: &UserProfile) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email())
        .bind(user.name())
        .bind(user.image_url())
        .bind(user.created_at().as_datetime())
        .bind(user.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: sqlx::postgres::PgRow) -> Result<UserProfile, DomainError> {
    let id: String = row.get("id");
    let email: String = row.get("email");
    let name: Option<String> = row.get("name");
    let image_url: Option<String> = row.get("image_url");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let id = UserId::new(id).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored user id: {}", e))
    })?;

    Ok(UserProfile::reconstitute(
        id,
        email,
        name,
        image_url,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
