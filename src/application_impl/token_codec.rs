use crate::application_port::{AuthError, TokenClaims, TokenCodec};
use crate::domain_model::TokenType;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    iss: String,
    jti: String,
    /// Token class tag. Checked against the expected class even though each
    /// class already verifies under its own secret.
    typ: String,
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }

    #[inline]
    fn secret(&self, token_type: TokenType) -> &[u8] {
        match token_type {
            TokenType::Access => &self.cfg.access_secret,
            TokenType::Refresh => &self.cfg.refresh_secret,
        }
    }

    #[inline]
    fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.cfg.access_ttl,
            TokenType::Refresh => self.cfg.refresh_ttl,
        }
    }

    fn decode_claims(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = true;
        v.leeway = 0;
        v.set_issuer(&[self.cfg.issuer.clone()]);
        let data = decode::<Claims>(token, &DecodingKey::from_secret(self.secret(expected)), &v)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;
        if data.claims.typ != expected.as_str() {
            return Err(AuthError::TokenInvalid);
        }
        Ok(data.claims)
    }
}

impl TokenCodec for JwtHs256Codec {
    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let iat_dt = Utc::now();
        let exp_dt = iat_dt + self.ttl(token_type);
        let claims = Claims {
            sub: subject.to_string(),
            iat: iat_dt.timestamp(),
            exp: exp_dt.timestamp(),
            iss: self.cfg.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: token_type.as_str().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(token_type)),
        )
        .map_err(|e| AuthError::InternalError(e.to_string()))?;
        Ok((token, exp_dt))
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_claims(token, expected)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or(AuthError::TokenInvalid)?;
        Ok(TokenClaims {
            subject: claims.sub,
            expires_at,
        })
    }

    fn remaining_validity(&self, token: &str, token_type: TokenType) -> Duration {
        match self.verify(token, token_type) {
            Ok(claims) => std::cmp::max(claims.expires_at - Utc::now(), Duration::zero()),
            Err(_) => Duration::zero(),
        }
    }
}
