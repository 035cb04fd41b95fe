use crate::application_port::AuthError;
use crate::domain_model::{UserId, UserRecord};
use crate::domain_port::StorageTx;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        username: &str,
        password_hash: &str,
    ) -> Result<(), AuthError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;
    async fn username_exists(&self, username: &str) -> Result<bool, AuthError>;
}
