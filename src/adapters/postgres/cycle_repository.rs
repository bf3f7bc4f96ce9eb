//! PostgreSQL implementation of CycleRepository.
//!
//! Persists LearningCycle aggregates with the cached feedback stored as JSONB.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::cycle::{CycleContent, LearningCycle, Stage};
use crate::domain::feedback::FeedbackResult;
use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, SkillId, Timestamp, UserId,
};
use crate::ports::{CycleFilter, CycleRepository};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, skill_id, title, concrete_experience, reflective_observation,
           abstract_conceptualization, active_experimentation, feedback,
           created_at, updated_at
    FROM learning_cycles
"#;

/// PostgreSQL implementation of CycleRepository.
#[derive(Clone)]
pub struct PostgresCycleRepository {
    pool: PgPool,
}

impl PostgresCycleRepository {
    /// Creates a new PostgresCycleRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CycleRepository for PostgresCycleRepository {
    async fn save(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        let feedback = feedback_to_json(cycle.feedback())?;

        sqlx::query(
            r#"
            INSERT INTO learning_cycles (
                id, user_id, skill_id, title, concrete_experience, reflective_observation,
                abstract_conceptualization, active_experimentation, feedback,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(cycle.id().as_uuid())
        .bind(cycle.user_id().as_str())
        .bind(cycle.skill_id().map(|id| *id.as_uuid()))
        .bind(cycle.title())
        .bind(cycle.stage_text(Stage::ConcreteExperience))
        .bind(cycle.stage_text(Stage::ReflectiveObservation))
        .bind(cycle.stage_text(Stage::AbstractConceptualization))
        .bind(cycle.stage_text(Stage::ActiveExperimentation))
        .bind(feedback)
        .bind(cycle.created_at().as_datetime())
        .bind(cycle.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert learning cycle", e))?;

        Ok(())
    }

    async fn update(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        let feedback = feedback_to_json(cycle.feedback())?;

        let result = sqlx::query(
            r#"
            UPDATE learning_cycles SET
                skill_id = $3,
                title = $4,
                concrete_experience = $5,
                reflective_observation = $6,
                abstract_conceptualization = $7,
                active_experimentation = $8,
                feedback = $9,
                updated_at = $10
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(cycle.id().as_uuid())
        .bind(cycle.user_id().as_str())
        .bind(cycle.skill_id().map(|id| *id.as_uuid()))
        .bind(cycle.title())
        .bind(cycle.stage_text(Stage::ConcreteExperience))
        .bind(cycle.stage_text(Stage::ReflectiveObservation))
        .bind(cycle.stage_text(Stage::AbstractConceptualization))
        .bind(cycle.stage_text(Stage::ActiveExperimentation))
        .bind(feedback)
        .bind(cycle.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update learning cycle", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Learning cycle not found: {}", cycle.id()),
            ));
        }

        Ok(())
    }

    async fn record_feedback(
        &self,
        id: &CycleId,
        owner: &UserId,
        expected_updated_at: Timestamp,
        feedback: &FeedbackResult,
    ) -> Result<bool, DomainError> {
        let feedback = feedback_to_json(Some(feedback))?;

        let result = sqlx::query(
            r#"
            UPDATE learning_cycles SET
                feedback = $4,
                updated_at = $5
            WHERE id = $1 AND user_id = $2 AND updated_at = $3
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .bind(expected_updated_at.as_datetime())
        .bind(feedback)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to store cycle feedback", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_for_owner(
        &self,
        id: &CycleId,
        owner: &UserId,
    ) -> Result<Option<LearningCycle>, DomainError> {
        let sql = format!("{} WHERE id = $1 AND user_id = $2", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch learning cycle", e))?;

        row.map(row_to_cycle).transpose()
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
        filter: CycleFilter,
    ) -> Result<Vec<LearningCycle>, DomainError> {
        let sql = format!(
            "{} WHERE user_id = $1 AND ($2::uuid IS NULL OR skill_id = $2) \
             ORDER BY updated_at DESC LIMIT $3",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(owner.as_str())
            .bind(filter.skill_id.map(|id| *id.as_uuid()))
            .bind(filter.limit.map(i64::from))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list learning cycles", e))?;

        rows.into_iter().map(row_to_cycle).collect()
    }

    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM learning_cycles WHERE user_id = $1")
                .bind(owner.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to count learning cycles", e))?;

        Ok(result.0.max(0) as u64)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Row Mapping
// ════════════════════════════════════════════════════════════════════════════════

fn row_to_cycle(row: sqlx::postgres::PgRow) -> Result<LearningCycle, DomainError> {
    let id: Uuid = row.get("id");
    let user_id: String = row.get("user_id");
    let skill_id: Option<Uuid> = row.get("skill_id");
    let feedback: Option<serde_json::Value> = row.get("feedback");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let content = CycleContent::new(
        row.get::<String, _>("title"),
        row.get::<String, _>("concrete_experience"),
        row.get::<String, _>("reflective_observation"),
        row.get::<String, _>("abstract_conceptualization"),
        row.get::<String, _>("active_experimentation"),
    )
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored cycle text: {}", e))
            .with_detail("cycle_id", id.to_string())
    })?;

    let user_id = UserId::new(user_id).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored user id: {}", e))
    })?;

    Ok(LearningCycle::reconstitute(
        CycleId::from_uuid(id),
        user_id,
        skill_id.map(SkillId::from_uuid),
        content,
        json_to_feedback(feedback)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn feedback_to_json(
    feedback: Option<&FeedbackResult>,
) -> Result<Option<serde_json::Value>, DomainError> {
    feedback
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize feedback: {}", e),
            )
        })
}

fn json_to_feedback(
    value: Option<serde_json::Value>,
) -> Result<Option<FeedbackResult>, DomainError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored feedback: {}", e),
            )
        }),
    }
}
