use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Task, TaskDraft, TaskPatch};

/// Errors surfaced by task storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Durable storage of tasks keyed by id.
///
/// Every operation takes the owner id and only ever sees that owner's
/// records. A mismatched or absent id is `None`/`false`, never an error:
/// callers cannot distinguish "someone else's task" from "no such task".
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks owned by `owner_id`, oldest first.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Point lookup scoped to `owner_id`.
    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Create a task owned by `owner_id`. The store assigns id and timestamps.
    async fn insert(&self, owner_id: Uuid, draft: TaskDraft) -> Result<Task, StoreError>;

    /// Apply the present fields of `patch` and refresh `updated_at`.
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError>;

    /// Delete the task, returning whether a record was removed.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

/// Shared handle used by the router and handlers.
pub type DynTaskRepository = Arc<dyn TaskRepository>;
