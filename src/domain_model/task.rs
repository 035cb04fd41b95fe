use crate::domain_model::UserId;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct TaskId(pub uuid::Uuid);

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub done: bool,
}
