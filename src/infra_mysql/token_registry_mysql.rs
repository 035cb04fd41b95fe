use super::util::{downcast, is_dup_key};
use crate::application_port::AuthError;
use crate::domain_model::{TokenRecord, TokenType};
use crate::domain_port::{StorageTx, TokenRegistry};
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlConnection, MySqlPool, Row};
use uuid::Uuid;

pub struct MySqlTokenRegistry {
    pool: MySqlPool,
}

impl MySqlTokenRegistry {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlTokenRegistry { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<TokenRecord, AuthError> {
        let id_bytes: Vec<u8> = row
            .try_get("id")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let id = Uuid::from_slice(&id_bytes).map_err(|e| AuthError::Store(e.to_string()))?;

        let token: String = row
            .try_get("token")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let subject: String = row
            .try_get("subject")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let type_str: String = row
            .try_get("token_type")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let token_type = TokenType::parse(&type_str).ok_or(AuthError::TokenInvalid)?;
        let revoked: bool = row
            .try_get("revoked")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(TokenRecord {
            id,
            token,
            subject,
            token_type,
            revoked,
            created_at,
        })
    }

    async fn insert(conn: &mut MySqlConnection, record: &TokenRecord) -> Result<(), AuthError> {
        sqlx::query(
            r#"
INSERT INTO user_token (id, token, subject, token_type, revoked, created_at)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(record.id.as_bytes() as &[u8])
        .bind(&record.token)
        .bind(&record.subject)
        .bind(record.token_type.as_str())
        .bind(record.revoked)
        .bind(record.created_at)
        .execute(conn)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::DuplicateToken
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenRegistry for MySqlTokenRegistry {
    async fn put(&self, record: TokenRecord) -> Result<(), AuthError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Self::insert(&mut conn, &record).await
    }

    async fn put_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        record: TokenRecord,
    ) -> Result<(), AuthError> {
        let tx = downcast(tx);
        Self::insert(tx.conn(), &record).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<TokenRecord>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, token, subject, token_type, revoked, created_at
FROM user_token
WHERE token = ?
"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn revoke_all_active_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        subject: &str,
        token_type: TokenType,
    ) -> Result<(), AuthError> {
        let tx = downcast(tx);

        // Hits the (subject, token_type, revoked) index.
        sqlx::query(
            r#"
UPDATE user_token
SET revoked = 1
WHERE subject = ? AND token_type = ? AND revoked = 0
"#,
        )
        .bind(subject)
        .bind(token_type.as_str())
        .execute(tx.conn())
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query(r#"UPDATE user_token SET revoked = 1 WHERE token = ?"#)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }

    async fn rotate(&self, old_token: &str, new_token: &str) -> Result<bool, AuthError> {
        // Single-statement compare-and-swap: of two racing refreshes only one
        // can match the old value on a non-revoked row.
        let result = sqlx::query(
            r#"
UPDATE user_token
SET token = ?, created_at = ?
WHERE token = ? AND revoked = 0
"#,
        )
        .bind(new_token)
        .bind(Utc::now())
        .bind(old_token)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn purge_older_than(
        &self,
        cutoff: DateTime<Utc>,
        token_type: TokenType,
    ) -> Result<u64, AuthError> {
        let result = sqlx::query(
            r#"
DELETE FROM user_token
WHERE token_type = ? AND created_at < ?
"#,
        )
        .bind(token_type.as_str())
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
