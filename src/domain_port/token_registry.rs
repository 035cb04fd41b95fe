use crate::application_port::AuthError;
use crate::domain_model::{TokenRecord, TokenType};
use crate::domain_port::StorageTx;
use chrono::{DateTime, Duration, Utc};

/// Persisted bookkeeping for every issued token. The registry, not the
/// signer, is the authority on whether a token is still honored.
#[async_trait::async_trait]
pub trait TokenRegistry: Send + Sync {
    /// Fails with [`AuthError::DuplicateToken`] when the serialized value is
    /// already tracked. One record per token string, enforced by the store.
    async fn put(&self, record: TokenRecord) -> Result<(), AuthError>;
    async fn put_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        record: TokenRecord,
    ) -> Result<(), AuthError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<TokenRecord>, AuthError>;
    /// True iff the record exists, is not revoked and its registry clock is
    /// still inside `window`. Layered atop (not replacing) the signed expiry.
    async fn is_live(&self, token: &str, window: Duration) -> Result<bool, AuthError> {
        let now = Utc::now();
        Ok(self
            .find_by_token(token)
            .await?
            .map(|record| record.is_live(window, now))
            .unwrap_or(false))
    }
    /// Marks every live record of `token_type` for `subject` revoked. Runs
    /// inside the login transaction so revoke-then-issue is observed as one
    /// unit by concurrent refreshes.
    async fn revoke_all_active_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        subject: &str,
        token_type: TokenType,
    ) -> Result<(), AuthError>;
    /// No-op when the token is unknown.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;
    /// Replaces the token value on the existing record and resets its
    /// registry clock, keeping the record identity. Returns false when the
    /// record is missing, revoked, or was already rotated by a concurrent
    /// caller.
    async fn rotate(&self, old_token: &str, new_token: &str) -> Result<bool, AuthError>;
    /// Bulk-deletes records of `token_type` created before `cutoff`.
    /// Returns the number of rows removed.
    async fn purge_older_than(
        &self,
        cutoff: DateTime<Utc>,
        token_type: TokenType,
    ) -> Result<u64, AuthError>;
}
