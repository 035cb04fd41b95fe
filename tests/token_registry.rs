use chrono::{Duration, Utc};
use taskboard::application_port::AuthError;
use taskboard::domain_model::{TokenRecord, TokenType};
use taskboard::domain_port::{TokenRegistry, TxManager};
use taskboard::infra_memory::{MemoryTokenRegistry, MemoryTxManager};

fn record(token: &str, subject: &str, token_type: TokenType) -> TokenRecord {
    TokenRecord::new(token.to_string(), subject.to_string(), token_type)
}

fn backdated(token: &str, subject: &str, token_type: TokenType, age: Duration) -> TokenRecord {
    let mut rec = record(token, subject, token_type);
    rec.created_at = Utc::now() - age;
    rec
}

#[tokio::test]
async fn put_rejects_a_duplicate_token_value() {
    let registry = MemoryTokenRegistry::new();

    registry
        .put(record("tok-1", "alicesmith", TokenType::Refresh))
        .await
        .unwrap();
    let err = registry
        .put(record("tok-1", "bobjones1", TokenType::Access))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::DuplicateToken));
}

#[tokio::test]
async fn revoke_of_an_unknown_token_is_a_noop() {
    let registry = MemoryTokenRegistry::new();
    registry.revoke("never-seen").await.unwrap();
}

#[tokio::test]
async fn rotate_fails_for_unknown_or_revoked_records() {
    let registry = MemoryTokenRegistry::new();

    assert!(!registry.rotate("never-seen", "tok-new").await.unwrap());

    registry
        .put(record("tok-1", "alicesmith", TokenType::Refresh))
        .await
        .unwrap();
    registry.revoke("tok-1").await.unwrap();

    assert!(!registry.rotate("tok-1", "tok-new").await.unwrap());

    // The revoked record is untouched by the failed rotation.
    let rec = registry.find_by_token("tok-1").await.unwrap().unwrap();
    assert!(rec.revoked);
    assert!(registry.find_by_token("tok-new").await.unwrap().is_none());
}

#[tokio::test]
async fn rotate_replaces_the_value_and_resets_the_clock() {
    let registry = MemoryTokenRegistry::new();
    let old = backdated("tok-1", "alicesmith", TokenType::Refresh, Duration::hours(12));
    let old_id = old.id;
    registry.put(old).await.unwrap();

    assert!(registry.rotate("tok-1", "tok-2").await.unwrap());

    assert!(registry.find_by_token("tok-1").await.unwrap().is_none());
    let rotated = registry.find_by_token("tok-2").await.unwrap().unwrap();
    assert_eq!(rotated.id, old_id);
    assert!(!rotated.revoked);
    assert!(rotated.created_at > Utc::now() - Duration::minutes(1));

    // The losing side of a concurrent rotation sees false.
    assert!(!registry.rotate("tok-1", "tok-3").await.unwrap());
}

#[tokio::test]
async fn revoke_all_active_only_touches_matching_subject_and_type() {
    let registry = MemoryTokenRegistry::new();
    registry
        .put(record("tok-a", "alicesmith", TokenType::Refresh))
        .await
        .unwrap();
    registry
        .put(record("tok-b", "alicesmith", TokenType::Access))
        .await
        .unwrap();
    registry
        .put(record("tok-c", "bobjones1", TokenType::Refresh))
        .await
        .unwrap();

    let tx_manager = MemoryTxManager;
    let mut tx = tx_manager.begin().await.unwrap();
    registry
        .revoke_all_active_in_tx(tx.as_mut(), "alicesmith", TokenType::Refresh)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(registry.find_by_token("tok-a").await.unwrap().unwrap().revoked);
    assert!(!registry.find_by_token("tok-b").await.unwrap().unwrap().revoked);
    assert!(!registry.find_by_token("tok-c").await.unwrap().unwrap().revoked);
}

#[tokio::test]
async fn purge_removes_only_old_records_of_the_requested_type() {
    let registry = MemoryTokenRegistry::new();
    registry
        .put(backdated("tok-old", "alicesmith", TokenType::Refresh, Duration::minutes(2000)))
        .await
        .unwrap();
    registry
        .put(backdated("tok-mid", "alicesmith", TokenType::Refresh, Duration::minutes(100)))
        .await
        .unwrap();
    registry
        .put(backdated("tok-new", "alicesmith", TokenType::Refresh, Duration::minutes(10)))
        .await
        .unwrap();
    registry
        .put(backdated("tok-acc", "alicesmith", TokenType::Access, Duration::minutes(2000)))
        .await
        .unwrap();

    let cutoff = Utc::now() - Duration::minutes(1440);
    let purged = registry
        .purge_older_than(cutoff, TokenType::Refresh)
        .await
        .unwrap();

    assert_eq!(purged, 1);
    assert!(registry.find_by_token("tok-old").await.unwrap().is_none());
    assert!(registry.find_by_token("tok-mid").await.unwrap().is_some());
    assert!(registry.find_by_token("tok-new").await.unwrap().is_some());
    // The access pass runs with its own cutoff; a refresh purge leaves it be.
    assert!(registry.find_by_token("tok-acc").await.unwrap().is_some());
}

#[tokio::test]
async fn is_live_honors_revocation_and_the_registry_window() {
    let registry = MemoryTokenRegistry::new();
    let window = Duration::minutes(1440);

    registry
        .put(record("tok-fresh", "alicesmith", TokenType::Refresh))
        .await
        .unwrap();
    registry
        .put(backdated("tok-aged", "alicesmith", TokenType::Refresh, Duration::minutes(1441)))
        .await
        .unwrap();
    registry
        .put(record("tok-dead", "alicesmith", TokenType::Refresh))
        .await
        .unwrap();
    registry.revoke("tok-dead").await.unwrap();

    assert!(registry.is_live("tok-fresh", window).await.unwrap());
    assert!(!registry.is_live("tok-aged", window).await.unwrap());
    assert!(!registry.is_live("tok-dead", window).await.unwrap());
    assert!(!registry.is_live("tok-missing", window).await.unwrap());
}
