use chrono::{Duration, Utc};
use std::sync::Arc;
use taskboard::domain_model::{TokenRecord, TokenType};
use taskboard::domain_port::TokenRegistry;
use taskboard::infra_memory::MemoryTokenRegistry;
use taskboard::server::{SweepConfig, Sweeper};
use tokio_util::sync::CancellationToken;

fn backdated(token: &str, token_type: TokenType, age: Duration) -> TokenRecord {
    let mut rec = TokenRecord::new(token.to_string(), "alicesmith".to_string(), token_type);
    rec.created_at = Utc::now() - age;
    rec
}

fn config() -> SweepConfig {
    SweepConfig {
        period: std::time::Duration::from_secs(21600),
        refresh_retention: Duration::minutes(1440),
        access_retention: Duration::minutes(60),
    }
}

#[tokio::test]
async fn sweep_applies_a_retention_per_token_type() {
    let registry = Arc::new(MemoryTokenRegistry::new());

    registry
        .put(backdated("ref-old", TokenType::Refresh, Duration::minutes(2000)))
        .await
        .unwrap();
    registry
        .put(backdated("ref-new", TokenType::Refresh, Duration::minutes(10)))
        .await
        .unwrap();
    registry
        .put(backdated("acc-old", TokenType::Access, Duration::minutes(120)))
        .await
        .unwrap();
    registry
        .put(backdated("acc-new", TokenType::Access, Duration::minutes(5)))
        .await
        .unwrap();

    let sweeper = Sweeper::new(registry.clone(), config(), CancellationToken::new());
    sweeper.sweep().await;

    assert!(registry.find_by_token("ref-old").await.unwrap().is_none());
    assert!(registry.find_by_token("ref-new").await.unwrap().is_some());
    assert!(registry.find_by_token("acc-old").await.unwrap().is_none());
    assert!(registry.find_by_token("acc-new").await.unwrap().is_some());
}

#[tokio::test]
async fn sweeper_stops_on_cancellation() {
    let registry = Arc::new(MemoryTokenRegistry::new());
    let cancel = CancellationToken::new();
    let sweeper = Sweeper::new(registry, config(), cancel.clone());

    let handle = tokio::spawn(sweeper.run());
    cancel.cancel();

    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("sweeper did not stop")
        .unwrap();
}
