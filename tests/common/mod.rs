use chrono::Duration;
use std::sync::Arc;
use taskboard::application_impl::{
    Argon2PasswordHasher, JwtConfig, JwtHs256Codec, RealAuthService, SessionPolicy,
};
use taskboard::application_port::{AuthService, AuthTokens, LoginInput, SignupInput};
use taskboard::infra_memory::{MemoryTokenRegistry, MemoryTxManager, MemoryUserRepo};

pub const USERNAME: &str = "alicesmith";
pub const PASSWORD: &str = "hunter2xyz";

pub struct Harness {
    pub auth_service: Arc<dyn AuthService>,
    pub registry: Arc<MemoryTokenRegistry>,
    pub codec: Arc<JwtHs256Codec>,
}

pub struct HarnessConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub registry_window: Duration,
    pub rotation_threshold: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            registry_window: Duration::minutes(1440),
            rotation_threshold: Duration::seconds(60),
        }
    }
}

/// Memory-backed service wired like the server does it, with one seeded user.
pub async fn harness(config: HarnessConfig) -> Harness {
    let codec = Arc::new(JwtHs256Codec::new(JwtConfig {
        issuer: "taskboard-test".to_string(),
        access_ttl: config.access_ttl,
        refresh_ttl: config.refresh_ttl,
        access_secret: b"test-access-secret".to_vec(),
        refresh_secret: b"test-refresh-secret".to_vec(),
    }));
    let registry = Arc::new(MemoryTokenRegistry::new());
    let user_repo = Arc::new(MemoryUserRepo::new());

    let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
        user_repo,
        registry.clone(),
        Arc::new(Argon2PasswordHasher),
        codec.clone(),
        Arc::new(MemoryTxManager),
        SessionPolicy {
            registry_window: config.registry_window,
            rotation_threshold: config.rotation_threshold,
        },
    ));

    auth_service
        .signup(SignupInput {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("seed user");

    Harness {
        auth_service,
        registry,
        codec,
    }
}

pub async fn login(harness: &Harness) -> AuthTokens {
    harness
        .auth_service
        .login(LoginInput {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("login")
        .tokens
}
