use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::database::repository::{StoreError, TaskRepository};

/// In-memory task storage.
///
/// Serves as the backend when no DATABASE_URL is configured and as the
/// store under the integration test suite. Owner scoping matches the
/// Postgres implementation exactly.
#[derive(Debug, Default)]
pub struct MemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| (t.created_at, t.id));
        Ok(owned)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, owner_id: Uuid, draft: TaskDraft) -> Result<Task, StoreError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            owner_id,
            created_at: now,
            updated_at: now,
        };

        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = match tasks.get_mut(&id).filter(|t| t.owner_id == owner_id) {
            Some(task) => task,
            None => return Ok(None),
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        // updated_at must never go backwards, even if the clock is too
        // coarse to have ticked since the last write
        let mut now = Utc::now();
        if now <= task.updated_at {
            now = task.updated_at + Duration::microseconds(1);
        }
        task.updated_at = now;

        Ok(Some(task.clone()))
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get(&id) {
            Some(t) if t.owner_id == owner_id => {
                tasks.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
