use crate::application_port::AuthError;
use crate::domain_model::{UserId, UserRecord};
use crate::domain_port::{StorageTx, UserRepo};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub struct MemoryUserRepo {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        MemoryUserRepo {
            users: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, UserRecord>>, AuthError> {
        self.users
            .lock()
            .map_err(|_| AuthError::InternalError("poisoned user lock".to_string()))
    }
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        username: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let mut users = self.lock()?;
        if users.contains_key(username) {
            return Err(AuthError::UserExists);
        }
        users.insert(
            username.to_string(),
            UserRecord {
                user_id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                is_active: true,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.lock()?.get(username).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.lock()?.contains_key(username))
    }
}
