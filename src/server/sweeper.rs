use crate::domain_model::TokenType;
use crate::domain_port::TokenRegistry;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub period: Duration,
    pub refresh_retention: chrono::Duration,
    pub access_retention: chrono::Duration,
}

/// Periodic purge of stale registry rows. A failed pass is logged and the
/// loop waits for the next tick; there is no mid-cycle retry.
pub struct Sweeper {
    registry: Arc<dyn TokenRegistry>,
    config: SweepConfig,
    cancel: CancellationToken,
}

impl Sweeper {
    pub fn new(
        registry: Arc<dyn TokenRegistry>,
        config: SweepConfig,
        cancel: CancellationToken,
    ) -> Self {
        Sweeper {
            registry,
            config,
            cancel,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => self.sweep().await,
            }
        }

        info!("sweeper stopped");
    }

    pub async fn sweep(&self) {
        let now = Utc::now();
        let passes = [
            (TokenType::Refresh, self.config.refresh_retention),
            (TokenType::Access, self.config.access_retention),
        ];

        for (token_type, retention) in passes {
            match self
                .registry
                .purge_older_than(now - retention, token_type)
                .await
            {
                Ok(0) => debug!(%token_type, "sweep found nothing to purge"),
                Ok(purged) => info!(%token_type, purged, "sweep removed stale token records"),
                Err(e) => warn!(%token_type, "sweep failed, will retry next tick: {}", e),
            }
        }
    }
}
