use crate::application_port::{TaskError, TaskInput, TaskService};
use crate::domain_model::{Task, TaskId, UserId};
use crate::domain_port::TaskRepo;
use std::sync::Arc;
use uuid::Uuid;

pub struct RealTaskService {
    task_repo: Arc<dyn TaskRepo>,
}

impl RealTaskService {
    pub fn new(task_repo: Arc<dyn TaskRepo>) -> Self {
        RealTaskService { task_repo }
    }

    async fn get_owned(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError> {
        let task = self
            .task_repo
            .find_by_id(task_id)
            .await?
            .ok_or(TaskError::NotFound)?;
        if task.user_id != user_id {
            return Err(TaskError::Forbidden);
        }
        Ok(task)
    }
}

#[async_trait::async_trait]
impl TaskService for RealTaskService {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Task>, TaskError> {
        self.task_repo.find_by_user(user_id).await
    }

    async fn create(&self, user_id: UserId, input: TaskInput) -> Result<Task, TaskError> {
        let task = Task {
            id: TaskId(Uuid::new_v4()),
            user_id,
            title: input.title,
            description: input.description,
            done: input.done,
        };
        self.task_repo.insert(&task).await?;
        Ok(task)
    }

    async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        input: TaskInput,
    ) -> Result<Task, TaskError> {
        let mut task = self.get_owned(user_id, task_id).await?;
        task.title = input.title;
        task.description = input.description;
        task.done = input.done;
        self.task_repo.update(&task).await?;
        Ok(task)
    }

    async fn delete(&self, user_id: UserId, task_id: TaskId) -> Result<(), TaskError> {
        self.get_owned(user_id, task_id).await?;
        self.task_repo.delete(task_id).await
    }
}
