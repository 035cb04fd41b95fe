use crate::application_port::TaskError;
use crate::domain_model::{Task, TaskId, UserId};
use crate::domain_port::TaskRepo;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub struct MemoryTaskRepo {
    tasks: Mutex<HashMap<TaskId, Task>>,
}

impl MemoryTaskRepo {
    pub fn new() -> Self {
        MemoryTaskRepo {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TaskId, Task>>, TaskError> {
        self.tasks
            .lock()
            .map_err(|_| TaskError::Store("poisoned task lock".to_string()))
    }
}

impl Default for MemoryTaskRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TaskRepo for MemoryTaskRepo {
    async fn insert(&self, task: &Task) -> Result<(), TaskError> {
        self.lock()?.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_by_id(&self, task_id: TaskId) -> Result<Option<Task>, TaskError> {
        Ok(self.lock()?.get(&task_id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .lock()?
            .values()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, task: &Task) -> Result<(), TaskError> {
        self.lock()?.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete(&self, task_id: TaskId) -> Result<(), TaskError> {
        self.lock()?.remove(&task_id);
        Ok(())
    }
}
