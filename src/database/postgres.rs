use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::database::repository::{StoreError, TaskRepository};

const TASK_COLUMNS: &str = "id, title, description, completed, owner_id, created_at, updated_at";

/// Postgres-backed task storage.
///
/// Id generation and timestamp management are the database's job; every
/// statement that touches a specific record is scoped by owner_id in the
/// WHERE clause, so a mismatched owner reads as zero rows.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One-statement idempotent bootstrap. Not a migration framework.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id          uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                title       text NOT NULL,
                description text NOT NULL DEFAULT '',
                completed   boolean NOT NULL DEFAULT false,
                owner_id    uuid NOT NULL,
                created_at  timestamptz NOT NULL DEFAULT now(),
                updated_at  timestamptz NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

/// Build the connection pool from DATABASE_URL and config limits
pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(database_url)
        .await?;

    info!("Created database pool (max_connections={})", config.max_connections);
    Ok(pool)
}

/// Pings the pool to ensure connectivity before serving
pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = $1 ORDER BY created_at, id"
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner_id = $2");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert(&self, owner_id: Uuid, draft: TaskDraft) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, completed, owner_id) \
             VALUES ($1, $2, $3, $4) RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.completed)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        // COALESCE keeps absent fields unchanged in a single atomic statement
        let sql = format!(
            "UPDATE tasks SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                completed = COALESCE($3, completed), \
                updated_at = GREATEST(clock_timestamp(), updated_at) \
             WHERE id = $4 AND owner_id = $5 RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.completed)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
