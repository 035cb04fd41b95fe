use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::server::{SweepConfig, Sweeper};
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub task_service: Arc<dyn TaskService>,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        // Missing signing secrets are fatal here; the codec never fails at
        // call time for configuration reasons.
        if settings.jwt.access_secret.is_empty() || settings.jwt.refresh_secret.is_empty() {
            return Err(anyhow::anyhow!(
                "jwt.access_secret and jwt.refresh_secret must be configured"
            ));
        }

        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            issuer: settings.jwt.issuer.clone(),
            access_ttl: chrono::Duration::seconds(settings.jwt.access_ttl_secs as i64),
            refresh_ttl: chrono::Duration::seconds(settings.jwt.refresh_ttl_secs as i64),
            access_secret: settings.jwt.access_secret.clone().into_bytes(),
            refresh_secret: settings.jwt.refresh_secret.clone().into_bytes(),
        }));
        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher {});
        let policy = SessionPolicy {
            registry_window: chrono::Duration::minutes(
                settings.session.registry_window_minutes as i64,
            ),
            rotation_threshold: chrono::Duration::seconds(
                settings.session.rotation_threshold_secs as i64,
            ),
        };

        let user_repo: Arc<dyn UserRepo>;
        let task_repo: Arc<dyn TaskRepo>;
        let token_registry: Arc<dyn TokenRegistry>;
        let tx_manager: Arc<dyn TxManager>;
        let pool: Option<Pool<MySql>>;

        match settings.storage.backend.as_str() {
            "mysql" => {
                let p = Pool::<MySql>::connect(&settings.database.url).await?;
                user_repo = Arc::new(MySqlUserRepo::new(p.clone()));
                task_repo = Arc::new(MySqlTaskRepo::new(p.clone()));
                token_registry = Arc::new(MySqlTokenRegistry::new(p.clone()));
                tx_manager = Arc::new(MySqlTxManager::new(p.clone()));
                pool = Some(p);
            }
            "memory" => {
                user_repo = Arc::new(MemoryUserRepo::new());
                task_repo = Arc::new(MemoryTaskRepo::new());
                token_registry = Arc::new(MemoryTokenRegistry::new());
                tx_manager = Arc::new(MemoryTxManager);
                pool = None;
            }
            other => return Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            user_repo.clone(),
            token_registry.clone(),
            credential_hasher,
            token_codec,
            tx_manager,
            policy,
        ));
        let task_service: Arc<dyn TaskService> = Arc::new(RealTaskService::new(task_repo));

        let cancel = CancellationToken::new();
        let sweeper = Sweeper::new(
            token_registry,
            SweepConfig {
                period: Duration::from_secs(settings.sweep.period_secs),
                refresh_retention: chrono::Duration::minutes(
                    settings.sweep.refresh_retention_minutes as i64,
                ),
                access_retention: chrono::Duration::minutes(
                    settings.sweep.access_retention_minutes as i64,
                ),
            },
            cancel.clone(),
        );
        let sweeper_handle = tokio::spawn(sweeper.run());

        info!("server started");

        Ok(Self {
            auth_service,
            task_service,
            sweeper_handle: Mutex::new(Some(sweeper_handle)),
            cancel,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        if let Ok(mut lock) = self.sweeper_handle.lock() {
            if let Some(handle) = lock.take() {
                let r = handle.await;
                info!("sweeper handle dropped: {:?}", r);
            }
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
