use crate::application_port::TaskError;
use crate::domain_model::{Task, TaskId, UserId};
use crate::domain_port::TaskRepo;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

pub struct MySqlTaskRepo {
    pool: MySqlPool,
}

impl MySqlTaskRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlTaskRepo { pool }
    }

    fn row_to_task(row: MySqlRow) -> Result<Task, TaskError> {
        let id_bytes: Vec<u8> = row.try_get("id").map_err(|e| TaskError::Store(e.to_string()))?;
        let user_id_bytes: Vec<u8> = row
            .try_get("user_id")
            .map_err(|e| TaskError::Store(e.to_string()))?;

        Ok(Task {
            id: TaskId(Uuid::from_slice(&id_bytes).map_err(|e| TaskError::Store(e.to_string()))?),
            user_id: UserId(
                Uuid::from_slice(&user_id_bytes).map_err(|e| TaskError::Store(e.to_string()))?,
            ),
            title: row
                .try_get("title")
                .map_err(|e| TaskError::Store(e.to_string()))?,
            description: row
                .try_get("description")
                .map_err(|e| TaskError::Store(e.to_string()))?,
            done: row
                .try_get("done")
                .map_err(|e| TaskError::Store(e.to_string()))?,
        })
    }
}

#[async_trait::async_trait]
impl TaskRepo for MySqlTaskRepo {
    async fn insert(&self, task: &Task) -> Result<(), TaskError> {
        sqlx::query(
            r#"
INSERT INTO task (id, user_id, title, description, done)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(task.id.0.as_bytes() as &[u8])
        .bind(task.user_id.0.as_bytes() as &[u8])
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.done)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::Store(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, task_id: TaskId) -> Result<Option<Task>, TaskError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, user_id, title, description, done
FROM task
WHERE id = ?
"#,
        )
        .bind(task_id.0.as_bytes() as &[u8])
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_task).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query(
            r#"
SELECT id, user_id, title, description, done
FROM task
WHERE user_id = ?
"#,
        )
        .bind(user_id.0.as_bytes() as &[u8])
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_task).collect()
    }

    async fn update(&self, task: &Task) -> Result<(), TaskError> {
        sqlx::query(
            r#"
UPDATE task
SET title = ?, description = ?, done = ?
WHERE id = ?
"#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.done)
        .bind(task.id.0.as_bytes() as &[u8])
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::Store(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, task_id: TaskId) -> Result<(), TaskError> {
        sqlx::query(r#"DELETE FROM task WHERE id = ?"#)
            .bind(task_id.0.as_bytes() as &[u8])
            .execute(&self.pool)
            .await
            .map_err(|e| TaskError::Store(e.to_string()))?;

        Ok(())
    }
}
