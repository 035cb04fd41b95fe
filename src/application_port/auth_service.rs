use crate::domain_model::{TokenType, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("token not recognized")]
    TokenNotRecognized,
    #[error("token stale")]
    TokenStale,
    #[error("token revoked")]
    TokenRevoked,
    #[error("duplicate token record")]
    DuplicateToken,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Identity established by the request verification filter and handed to
/// downstream handlers explicitly. There is no ambient per-request identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies tokens. Pure in-memory computation; each token class
/// has its own secret and carries its class inside the signed payload.
pub trait TokenCodec: Send + Sync {
    /// Mints a signed token. Only fails on misconfiguration, which the
    /// server treats as fatal at startup.
    fn issue(&self, subject: &str, token_type: TokenType)
    -> Result<(String, DateTime<Utc>), AuthError>;
    /// Fails with [`AuthError::TokenExpired`] when the signature is good but
    /// the embedded expiry has lapsed, [`AuthError::TokenInvalid`] for
    /// everything else (bad signature, malformed payload, wrong or unknown
    /// type tag).
    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError>;
    /// Time left until the embedded expiry; zero if invalid or expired.
    fn remaining_validity(&self, token: &str, token_type: TokenType) -> Duration;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    /// Access-token check for the request path: signature and embedded
    /// expiry only, plus a subject lookup. The registry is not consulted
    /// here; a revoked access token is honored until its short expiry.
    async fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;
    /// Accepts only refresh tokens. Idempotent.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;
}
