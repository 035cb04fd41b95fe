use crate::application_port::TaskError;
use crate::domain_model::{Task, TaskId, UserId};

#[async_trait::async_trait]
pub trait TaskRepo: Send + Sync {
    async fn insert(&self, task: &Task) -> Result<(), TaskError>;
    async fn find_by_id(&self, task_id: TaskId) -> Result<Option<Task>, TaskError>;
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Task>, TaskError>;
    async fn update(&self, task: &Task) -> Result<(), TaskError>;
    async fn delete(&self, task_id: TaskId) -> Result<(), TaskError>;
}
