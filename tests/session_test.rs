mod common;

use std::sync::{Arc, Mutex};

use serde_json::json;
use spotify_sdk::{
    Error,
    accounts::{ScopeSet, SerializedSession, Session},
};

use common::{ok, refused_url, serve};

#[tokio::test]
async fn refresh_keeps_refresh_token_when_none_is_returned() {
    let stub = serve(|_| ok(json!({"access_token": "new-access", "expires_in": 3600}))).await;
    let session = stub.session("old-access", Some("keep-me"));

    assert!(session.refresh().await.unwrap());
    assert_eq!(session.access_token(), "new-access");
    assert_eq!(session.refresh_token().as_deref(), Some("keep-me"));
    assert_eq!(session.scopes(), ScopeSet::parse("user-read-private user-read-email"));

    let request = &stub.requests()[0];
    assert_eq!(request.form_param("grant_type").as_deref(), Some("refresh_token"));
    assert_eq!(request.form_param("refresh_token").as_deref(), Some("keep-me"));
}

#[tokio::test]
async fn refresh_adopts_rotated_token_and_scopes() {
    let stub = serve(|_| {
        ok(json!({
            "access_token": "new-access",
            "expires_in": 60,
            "refresh_token": "rotated",
            "scope": "streaming"
        }))
    })
    .await;
    let session = stub.session("old-access", Some("old-refresh"));

    assert!(session.refresh().await.unwrap());
    assert_eq!(session.refresh_token().as_deref(), Some("rotated"));
    assert!(session.contains_scope("streaming"));
    assert!(!session.contains_scope("user-read-email"));
}

#[tokio::test]
async fn failed_refresh_leaves_tokens_untouched() {
    let stub = serve(|_| {
        (400, json!({"error": "invalid_grant", "error_description": "Refresh token revoked"}).to_string())
    })
    .await;
    let session = stub.session("old-access", Some("old-refresh"));
    let before = session.serialize();

    assert!(!session.refresh().await.unwrap());
    assert_eq!(session.serialize(), before);

    match session.try_refresh().await {
        Err(Error::RefreshFailed(message)) => assert!(message.contains("Refresh token revoked")),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(session.serialize(), before);
}

#[tokio::test]
async fn unreachable_token_endpoint_is_a_soft_failure() {
    let stub = serve(|_| ok(json!({}))).await;
    let base = refused_url().await;
    let accounts = Arc::new(
        (*stub.accounts())
            .clone()
            .with_endpoints(spotify_sdk::accounts::Endpoints::new(&base, &base)),
    );
    let session = Session::new(
        accounts,
        "old-access",
        Some(3600),
        Some("old-refresh".into()),
        ScopeSet::default(),
    );
    let before = session.serialize();

    assert!(!session.refresh().await.unwrap());
    assert_eq!(session.serialize(), before);
}

#[tokio::test]
async fn refresh_without_refresh_token_is_an_error() {
    let stub = serve(|_| ok(json!({"access_token": "never"}))).await;
    let session = stub.session("access", None);

    assert!(matches!(session.refresh().await, Err(Error::MissingRefreshToken)));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn refresh_hook_sees_the_new_state() {
    let stub = serve(|_| ok(json!({"access_token": "new-access", "expires_in": 3600}))).await;
    let seen: Arc<Mutex<Vec<SerializedSession>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let session = stub
        .session("old-access", Some("refresh"))
        .with_refresh_hook(move |state| sink.lock().unwrap().push(state.clone()));

    session.refresh().await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].access_token.as_deref(), Some("new-access"));
    assert_eq!(seen[0].refresh_token.as_deref(), Some("refresh"));
    assert_eq!(seen[0], session.serialize());
}

#[tokio::test]
async fn refresh_only_session_becomes_usable() {
    let stub = serve(|_| ok(json!({"access_token": "fresh", "expires_in": 3600}))).await;
    let session = Session::from_refresh_token(stub.accounts(), "long-lived");
    assert_eq!(session.expired(), None);

    assert!(session.refresh().await.unwrap());
    assert_eq!(session.access_token(), "fresh");
    assert_eq!(session.expired(), Some(false));
}

#[tokio::test]
async fn stored_session_survives_restore() {
    let stub = serve(|_| ok(json!({}))).await;
    let session = stub.session("access", Some("refresh"));
    let stored = session.serialize();
    let json = serde_json::to_string(&stored).unwrap();

    let restored = Session::restore(stub.accounts(), serde_json::from_str(&json).unwrap());
    assert_eq!(restored.serialize(), stored);
    assert_eq!(restored.expires_at(), session.expires_at());
}
