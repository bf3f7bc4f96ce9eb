//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - Local user records synchronized from the identity provider
//! - `PostgresSkillRepository` - User-defined skills
//! - `PostgresCycleRepository` - Learning cycles with cached feedback stored as JSONB
//!
//! `run_migrations` applies the embedded schema in `migrations/`.

mod cycle_repository;
mod skill_repository;
mod user_repository;

pub use cycle_repository::PostgresCycleRepository;
pub use skill_repository::PostgresSkillRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::PgPool;

/// Applies pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}
