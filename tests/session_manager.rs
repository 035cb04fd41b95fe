mod common;

use chrono::{Duration, Utc};
use common::{HarnessConfig, PASSWORD, USERNAME, harness, login};
use taskboard::application_port::{AuthError, LoginInput, SignupInput, TokenCodec};
use taskboard::domain_model::{TokenRecord, TokenType};
use taskboard::domain_port::TokenRegistry;

#[tokio::test]
async fn login_issues_a_tracked_token_pair() {
    let h = harness(HarnessConfig::default()).await;

    let tokens = login(&h).await;

    let user = h
        .auth_service
        .verify_token(&tokens.access_token.0)
        .await
        .unwrap();
    assert_eq!(user.username, USERNAME);

    for token in [&tokens.access_token.0, &tokens.refresh_token.0] {
        let rec = h.registry.find_by_token(token).await.unwrap().unwrap();
        assert_eq!(rec.subject, USERNAME);
        assert!(!rec.revoked);
    }
}

#[tokio::test]
async fn second_login_revokes_the_first_refresh_token() {
    let h = harness(HarnessConfig::default()).await;

    let first = login(&h).await;
    let second = login(&h).await;

    let err = h
        .auth_service
        .refresh_token(&first.refresh_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenRevoked));

    h.auth_service
        .refresh_token(&second.refresh_token.0)
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_keeps_the_refresh_token_when_plenty_of_life_remains() {
    let h = harness(HarnessConfig::default()).await;
    let tokens = login(&h).await;

    let refreshed = h
        .auth_service
        .refresh_token(&tokens.refresh_token.0)
        .await
        .unwrap();

    assert_ne!(refreshed.access_token.0, tokens.access_token.0);
    assert_eq!(refreshed.refresh_token.0, tokens.refresh_token.0);

    // The fresh access token is tracked too.
    assert!(
        h.registry
            .find_by_token(&refreshed.access_token.0)
            .await
            .unwrap()
            .is_some()
    );

    // A kept refresh token keeps working.
    h.auth_service
        .refresh_token(&tokens.refresh_token.0)
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_rotates_the_refresh_token_near_its_expiry() {
    let h = harness(HarnessConfig {
        refresh_ttl: Duration::seconds(30),
        rotation_threshold: Duration::seconds(60),
        ..HarnessConfig::default()
    })
    .await;
    let tokens = login(&h).await;

    let refreshed = h
        .auth_service
        .refresh_token(&tokens.refresh_token.0)
        .await
        .unwrap();
    assert_ne!(refreshed.refresh_token.0, tokens.refresh_token.0);

    // The superseded value is gone from the registry.
    let err = h
        .auth_service
        .refresh_token(&tokens.refresh_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));

    // The replacement carries the session forward.
    h.auth_service
        .refresh_token(&refreshed.refresh_token.0)
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_rejects_a_well_signed_but_untracked_token() {
    let h = harness(HarnessConfig::default()).await;

    let (unregistered, _) = h.codec.issue(USERNAME, TokenType::Refresh).unwrap();

    let err = h
        .auth_service
        .refresh_token(&unregistered)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));
}

#[tokio::test]
async fn refresh_fails_after_logout() {
    let h = harness(HarnessConfig::default()).await;
    let tokens = login(&h).await;

    h.auth_service.logout(&tokens.refresh_token.0).await.unwrap();

    let err = h
        .auth_service
        .refresh_token(&tokens.refresh_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenRevoked));
}

#[tokio::test]
async fn logout_is_idempotent_and_tolerates_unknown_tokens() {
    let h = harness(HarnessConfig::default()).await;
    let tokens = login(&h).await;

    h.auth_service.logout(&tokens.refresh_token.0).await.unwrap();
    h.auth_service.logout(&tokens.refresh_token.0).await.unwrap();

    let (unregistered, _) = h.codec.issue(USERNAME, TokenType::Refresh).unwrap();
    h.auth_service.logout(&unregistered).await.unwrap();
}

#[tokio::test]
async fn access_tokens_are_rejected_where_a_refresh_token_is_required() {
    let h = harness(HarnessConfig::default()).await;
    let tokens = login(&h).await;

    let err = h
        .auth_service
        .refresh_token(&tokens.access_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenInvalid));

    let err = h
        .auth_service
        .logout(&tokens.access_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenInvalid));
}

#[tokio::test]
async fn refresh_fails_once_the_registry_window_lapses() {
    // Signed for far longer than the registry is willing to honor it.
    let h = harness(HarnessConfig::default()).await;

    let (token, _) = h.codec.issue(USERNAME, TokenType::Refresh).unwrap();
    let mut rec = TokenRecord::new(token.clone(), USERNAME.to_string(), TokenType::Refresh);
    rec.created_at = Utc::now() - Duration::minutes(1450);
    h.registry.put(rec).await.unwrap();

    assert!(h.codec.verify(&token, TokenType::Refresh).is_ok());

    let err = h.auth_service.refresh_token(&token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenStale));
}

#[tokio::test]
async fn expired_refresh_cannot_refresh_but_can_still_log_out() {
    let h = harness(HarnessConfig {
        refresh_ttl: Duration::seconds(-5),
        ..HarnessConfig::default()
    })
    .await;
    let tokens = login(&h).await;

    let err = h
        .auth_service
        .refresh_token(&tokens.refresh_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));

    h.auth_service.logout(&tokens.refresh_token.0).await.unwrap();
    let rec = h
        .registry
        .find_by_token(&tokens.refresh_token.0)
        .await
        .unwrap()
        .unwrap();
    assert!(rec.revoked);
}

#[tokio::test]
async fn the_gate_rejects_expired_access_tokens() {
    let h = harness(HarnessConfig {
        access_ttl: Duration::seconds(-5),
        ..HarnessConfig::default()
    })
    .await;
    let tokens = login(&h).await;

    let err = h
        .auth_service
        .verify_token(&tokens.access_token.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));
}

#[tokio::test]
async fn the_gate_does_not_consult_the_registry() {
    let h = harness(HarnessConfig::default()).await;
    let tokens = login(&h).await;

    // Revocation only reaches the registry; an access token stays good for
    // its short signed lifetime regardless.
    h.registry.revoke(&tokens.access_token.0).await.unwrap();

    h.auth_service
        .verify_token(&tokens.access_token.0)
        .await
        .unwrap();
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let h = harness(HarnessConfig::default()).await;

    let err = h
        .auth_service
        .login(LoginInput {
            username: USERNAME.to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = h
        .auth_service
        .login(LoginInput {
            username: "nosuchuser".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn signup_enforces_uniqueness_and_minimum_lengths() {
    let h = harness(HarnessConfig::default()).await;

    let err = h
        .auth_service
        .signup(SignupInput {
            username: USERNAME.to_string(),
            password: "another-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserExists));

    let err = h
        .auth_service
        .signup(SignupInput {
            username: "bob".to_string(),
            password: "longenoughpw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));

    let err = h
        .auth_service
        .signup(SignupInput {
            username: "bobjones1".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));
}
