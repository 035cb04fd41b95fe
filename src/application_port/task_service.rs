use crate::domain_model::{Task, TaskId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found")]
    NotFound,
    #[error("task belongs to another user")]
    Forbidden,
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub done: bool,
}

#[async_trait::async_trait]
pub trait TaskService: Send + Sync {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Task>, TaskError>;
    async fn create(&self, user_id: UserId, input: TaskInput) -> Result<Task, TaskError>;
    async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        input: TaskInput,
    ) -> Result<Task, TaskError>;
    async fn delete(&self, user_id: UserId, task_id: TaskId) -> Result<(), TaskError>;
}
