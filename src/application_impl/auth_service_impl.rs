use crate::application_port::{
    AccessToken, AuthError, AuthService, AuthTokens, AuthenticatedUser, CredentialHasher,
    LoginInput, LoginResult, RefreshToken, SignupInput, TokenCodec,
};
use crate::domain_model::{TokenRecord, TokenType, UserId};
use crate::domain_port::{TokenRegistry, TxManager, UserRepo};
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct Argon2PasswordHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let argon2 = argon2::Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash).map_err(|e| {
            AuthError::InternalError(format!("invalid PHC hash: {}", e.to_string()))
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!(
                "verify error: {}",
                e.to_string()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// How long the registry honors a refresh record, measured from the
    /// record's own clock. Independent of the signed expiry.
    pub registry_window: Duration,
    /// Remaining signed validity below which a refresh rotates the token.
    /// An absolute duration, never derived from the configured lifetime.
    pub rotation_threshold: Duration,
}

pub struct RealAuthService {
    user_repo: Arc<dyn UserRepo>,
    token_registry: Arc<dyn TokenRegistry>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_codec: Arc<dyn TokenCodec>,
    tx_manager: Arc<dyn TxManager>,
    policy: SessionPolicy,
    min_username_len: usize,
    min_password_len: usize,
}

impl RealAuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        token_registry: Arc<dyn TokenRegistry>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_codec: Arc<dyn TokenCodec>,
        tx_manager: Arc<dyn TxManager>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            user_repo,
            token_registry,
            credential_hasher,
            token_codec,
            tx_manager,
            policy,
            min_username_len: 6,
            min_password_len: 6,
        }
    }

    fn validate_signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.len() < self.min_username_len {
            return Err(AuthError::InvalidInput("username too short".to_string()));
        }
        if password.len() < self.min_password_len {
            return Err(AuthError::InvalidInput("password too short".to_string()));
        }
        Ok(())
    }

    #[inline]
    fn new_user_id() -> UserId {
        UserId(Uuid::new_v4())
    }

    /// Precise registry-side classification for a presented refresh token.
    /// Distinctions are kept here; the API boundary may collapse them.
    fn classify_refresh_record(&self, record: &TokenRecord) -> Result<(), AuthError> {
        if record.token_type != TokenType::Refresh {
            return Err(AuthError::TokenInvalid);
        }
        if record.revoked {
            return Err(AuthError::TokenRevoked);
        }
        if Utc::now() >= record.created_at + self.policy.registry_window {
            return Err(AuthError::TokenStale);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError> {
        let SignupInput { username, password } = request;

        self.validate_signup(&username, &password)?;

        if self.user_repo.username_exists(&username).await? {
            return Err(AuthError::UserExists);
        }

        let user_id = Self::new_user_id();
        let password_hash = self.credential_hasher.hash_password(&password).await?;

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        self.user_repo
            .create_in_tx(tx.as_mut(), user_id, &username, &password_hash)
            .await?;
        tx.commit()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        info!(%user_id, "user registered");
        Ok(user_id)
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { username, password } = request;

        let rec = self
            .user_repo
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !rec.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let ok = self
            .credential_hasher
            .verify_password(&password, &rec.password_hash)
            .await?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, access_exp) = self.token_codec.issue(&rec.username, TokenType::Access)?;
        let (refresh_token, refresh_exp) =
            self.token_codec.issue(&rec.username, TokenType::Refresh)?;

        // One transaction: prior refresh sessions die and the new pair is
        // tracked before any caller sees the tokens.
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        self.token_registry
            .revoke_all_active_in_tx(tx.as_mut(), &rec.username, TokenType::Refresh)
            .await?;
        self.token_registry
            .put_in_tx(
                tx.as_mut(),
                TokenRecord::new(access_token.clone(), rec.username.clone(), TokenType::Access),
            )
            .await?;
        self.token_registry
            .put_in_tx(
                tx.as_mut(),
                TokenRecord::new(
                    refresh_token.clone(),
                    rec.username.clone(),
                    TokenType::Refresh,
                ),
            )
            .await?;
        tx.commit()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(LoginResult {
            user_id: rec.user_id,
            tokens: AuthTokens {
                access_token: AccessToken(access_token),
                refresh_token: RefreshToken(refresh_token),
                access_token_expires_at: access_exp,
                refresh_token_expires_at: refresh_exp,
            },
        })
    }

    async fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.token_codec.verify(token, TokenType::Access)?;

        let rec = self
            .user_repo
            .get_by_username(&claims.subject)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthenticatedUser {
            user_id: rec.user_id,
            username: rec.username,
        })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let claims = self.token_codec.verify(refresh_token, TokenType::Refresh)?;

        let record = self
            .token_registry
            .find_by_token(refresh_token)
            .await?
            .ok_or(AuthError::TokenNotRecognized)?;
        self.classify_refresh_record(&record)?;

        if self
            .user_repo
            .get_by_username(&claims.subject)
            .await?
            .is_none()
        {
            return Err(AuthError::UserNotFound);
        }

        let (access_token, access_exp) = self.token_codec.issue(&claims.subject, TokenType::Access)?;
        self.token_registry
            .put(TokenRecord::new(
                access_token.clone(),
                claims.subject.clone(),
                TokenType::Access,
            ))
            .await?;

        let remaining = self
            .token_codec
            .remaining_validity(refresh_token, TokenType::Refresh);
        let (refresh_out, refresh_exp) = if remaining < self.policy.rotation_threshold {
            let (new_refresh, new_exp) =
                self.token_codec.issue(&claims.subject, TokenType::Refresh)?;
            // Compare-and-swap on the token value; a concurrent refresh that
            // already rotated this record wins and we report the loss.
            if !self
                .token_registry
                .rotate(refresh_token, &new_refresh)
                .await?
            {
                return Err(AuthError::TokenNotRecognized);
            }
            (new_refresh, new_exp)
        } else {
            (refresh_token.to_string(), claims.expires_at)
        };

        Ok(AuthTokens {
            access_token: AccessToken(access_token),
            refresh_token: RefreshToken(refresh_out),
            access_token_expires_at: access_exp,
            refresh_token_expires_at: refresh_exp,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        // An expired refresh token can still be logged out; anything that is
        // not a refresh token at all is rejected.
        match self.token_codec.verify(refresh_token, TokenType::Refresh) {
            Ok(_) | Err(AuthError::TokenExpired) => {}
            Err(_) => return Err(AuthError::TokenInvalid),
        }

        self.token_registry.revoke(refresh_token).await
    }
}
