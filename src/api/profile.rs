use serde::Serialize;
use uuid::Uuid;

/// Profile view of the authenticated user. Tasks are bare id references,
/// not nested task objects.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub tasks: Vec<Uuid>,
}

impl UserProfile {
    pub fn new(id: Uuid, username: String, tasks: Vec<Uuid>) -> Self {
        Self { id, username, tasks }
    }
}
