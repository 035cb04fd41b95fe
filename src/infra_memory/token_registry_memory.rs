use crate::application_port::AuthError;
use crate::domain_model::{TokenRecord, TokenType};
use crate::domain_port::{StorageTx, TokenRegistry};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Single-process registry backend for local runs and tests. The `_in_tx`
/// operations apply immediately; the memory backend has no real transactions.
pub struct MemoryTokenRegistry {
    records: Mutex<HashMap<String, TokenRecord>>,
}

impl MemoryTokenRegistry {
    pub fn new() -> Self {
        MemoryTokenRegistry {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, TokenRecord>>, AuthError> {
        self.records
            .lock()
            .map_err(|_| AuthError::InternalError("poisoned registry lock".to_string()))
    }

    fn insert(&self, record: TokenRecord) -> Result<(), AuthError> {
        let mut records = self.lock()?;
        if records.contains_key(&record.token) {
            return Err(AuthError::DuplicateToken);
        }
        records.insert(record.token.clone(), record);
        Ok(())
    }
}

impl Default for MemoryTokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TokenRegistry for MemoryTokenRegistry {
    async fn put(&self, record: TokenRecord) -> Result<(), AuthError> {
        self.insert(record)
    }

    async fn put_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        record: TokenRecord,
    ) -> Result<(), AuthError> {
        self.insert(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<TokenRecord>, AuthError> {
        Ok(self.lock()?.get(token).cloned())
    }

    async fn revoke_all_active_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        subject: &str,
        token_type: TokenType,
    ) -> Result<(), AuthError> {
        let mut records = self.lock()?;
        for record in records.values_mut() {
            if record.subject == subject && record.token_type == token_type && !record.revoked {
                record.revoked = true;
            }
        }
        Ok(())
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        if let Some(record) = self.lock()?.get_mut(token) {
            record.revoked = true;
        }
        Ok(())
    }

    async fn rotate(&self, old_token: &str, new_token: &str) -> Result<bool, AuthError> {
        let mut records = self.lock()?;
        match records.remove(old_token) {
            Some(mut record) if !record.revoked => {
                record.token = new_token.to_string();
                record.created_at = Utc::now();
                records.insert(new_token.to_string(), record);
                Ok(true)
            }
            Some(record) => {
                // Revoked records stay put.
                records.insert(record.token.clone(), record);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn purge_older_than(
        &self,
        cutoff: DateTime<Utc>,
        token_type: TokenType,
    ) -> Result<u64, AuthError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|_, record| {
            record.token_type != token_type || record.created_at >= cutoff
        });
        Ok((before - records.len()) as u64)
    }
}
