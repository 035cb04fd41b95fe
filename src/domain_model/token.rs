use chrono::{DateTime, Duration, Utc};
use std::fmt;
use uuid::Uuid;

/// Closed set of token classes. The tag travels inside the signed payload and
/// as a string column in the registry; anything outside this set is rejected,
/// never defaulted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "ACCESS",
            TokenType::Refresh => "REFRESH",
        }
    }

    pub fn parse(s: &str) -> Option<TokenType> {
        match s {
            "ACCESS" => Some(TokenType::Access),
            "REFRESH" => Some(TokenType::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry row for one issued token. `created_at` is the registry's own
/// liveness clock; it is distinct from the expiry embedded in the signed
/// payload and the two can follow different policies.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub id: Uuid,
    pub token: String,
    pub subject: String,
    pub token_type: TokenType,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(token: String, subject: String, token_type: TokenType) -> Self {
        TokenRecord {
            id: Uuid::new_v4(),
            token,
            subject,
            token_type,
            revoked: false,
            created_at: Utc::now(),
        }
    }

    /// Registry-level liveness: not revoked and still inside `window` as
    /// measured from `created_at`.
    pub fn is_live(&self, window: Duration, now: DateTime<Utc>) -> bool {
        !self.revoked && now < self.created_at + window
    }
}
