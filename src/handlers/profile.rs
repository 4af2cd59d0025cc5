use axum::extract::Extension;

use crate::api::UserProfile;
use crate::database::DynTaskRepository;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/me - profile of the authenticated user, never anyone else's
pub async fn me(
    Extension(repo): Extension<DynTaskRepository>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let tasks = repo.list(auth_user.id).await?;
    let task_ids = tasks.into_iter().map(|task| task.id).collect();

    let profile = UserProfile::new(auth_user.id, auth_user.username, task_ids);
    Ok(ApiResponse::success(profile))
}
