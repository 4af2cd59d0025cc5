use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::api::tasks::{draft_from_json, patch_from_json, TaskOut};
use crate::database::DynTaskRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

// Every handler scopes its repository call to the authenticated principal.
// A valid id owned by someone else is reported as not found, never as
// forbidden.

/// GET /tasks - list the requester's tasks
pub async fn list(
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<TaskOut>> {
    let tasks = repo.list(auth_user.id).await?;

    let data = tasks
        .into_iter()
        .map(|task| TaskOut::from_task(task, &auth_user.username))
        .collect();
    Ok(ApiResponse::success(data))
}

/// POST /tasks - create a task owned by the requester
pub async fn create(
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> ApiResult<TaskOut> {
    let draft = draft_from_json(payload)?;
    let task = repo.insert(auth_user.id, draft).await?;

    Ok(ApiResponse::created(TaskOut::from_task(task, &auth_user.username)))
}

/// GET /tasks/:id - retrieve one of the requester's tasks
pub async fn retrieve(
    Path(id): Path<Uuid>,
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<TaskOut> {
    let task = repo
        .find(auth_user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(ApiResponse::success(TaskOut::from_task(task, &auth_user.username)))
}

/// PUT /tasks/:id - replace a task; omitted writable fields reset to defaults
pub async fn replace(
    Path(id): Path<Uuid>,
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> ApiResult<TaskOut> {
    let draft = draft_from_json(payload)?;
    let task = repo
        .update(auth_user.id, id, draft.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(ApiResponse::success(TaskOut::from_task(task, &auth_user.username)))
}

/// PATCH /tasks/:id - update the supplied fields of a task
pub async fn modify(
    Path(id): Path<Uuid>,
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> ApiResult<TaskOut> {
    let patch = patch_from_json(payload)?;
    let task = repo
        .update(auth_user.id, id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(ApiResponse::success(TaskOut::from_task(task, &auth_user.username)))
}

/// DELETE /tasks/:id - delete one of the requester's tasks
pub async fn destroy(
    Path(id): Path<Uuid>,
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<()> {
    let deleted = repo.delete(auth_user.id, id).await?;
    if !deleted {
        return Err(ApiError::not_found("Task not found"));
    }

    Ok(ApiResponse::<()>::no_content())
}
