//! PostgreSQL implementation of SkillRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, SkillId, Timestamp, UserId};
use crate::domain::skill::Skill;
use crate::ports::SkillRepository;

/// PostgreSQL implementation of SkillRepository.
#[derive(Clone)]
pub struct PostgresSkillRepository {
    pool: PgPool,
}

impl PostgresSkillRepository {
    /// Creates a new PostgresSkillRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillRepository for PostgresSkillRepository {
    async fn save(&self, skill: &Skill) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO skills (id, user_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(skill.id().as_uuid())
        .bind(skill.user_id().as_str())
        .bind(skill.name())
        .bind(skill.description())
        .bind(skill.created_at().as_datetime())
        .bind(skill.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert skill", e))?;

        Ok(())
    }

    async fn find_for_owner(
        &self,
        id: &SkillId,
        owner: &UserId,
    ) -> Result<Option<Skill>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM skills
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch skill", e))?;

        row.map(row_to_skill).transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Skill>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM skills
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list skills", e))?;

        rows.into_iter().map(row_to_skill).collect()
    }

    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM skills WHERE user_id = $1")
            .bind(owner.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to count skills", e))?;

        Ok(result.0.max(0) as u64)
    }
}

fn row_to_skill(row: sqlx::postgres::PgRow) -> Result<Skill, DomainError> {
    let id: Uuid = row.get("id");
    let user_id: String = row.get("user_id");
    let name: String = row.get("name");
    let description: Option<String> = row.get("description");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let user_id = UserId::new(user_id).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored user id: {}", e))
    })?;

    Ok(Skill::reconstitute(
        SkillId::from_uuid(id),
        user_id,
        name,
        description,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
