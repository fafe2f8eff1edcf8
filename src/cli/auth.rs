use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use rand::{Rng, distr::Alphanumeric};
use tokio::sync::Mutex;

use super::spinner;
use crate::{
    Result,
    accounts::Accounts,
    api::{CallbackOutcome, CallbackState, SharedCallbackState},
    error, info,
    management::SessionStore,
    server, success, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

pub async fn auth() -> Result<()> {
    let accounts = Arc::new(Accounts::from_env()?);
    let state = random_state();
    let shared: SharedCallbackState = Arc::new(Mutex::new(Some(CallbackState::new(&state))));

    let listener = server::bind().await?;
    let server_state = Arc::clone(&shared);
    let handle = tokio::spawn(async move {
        if let Err(e) = server::start_api_server(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let url = accounts.authorize_url(&[("state", state.as_str())])?;
    info!("Redirect URI: {}", accounts.redirect_uri());
    if webbrowser::open(url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        );
    }

    let pb = spinner("Waiting for authorization...");
    let outcome = wait_for_callback(&shared).await;
    pb.finish_and_clear();
    handle.abort();

    match outcome {
        Some(CallbackOutcome::Code(code)) => {
            let session = accounts.exchange_for_session(&code).await?;
            SessionStore::open().persist(&session.serialize()).await?;
            success!("Authorization successful. Granted scopes: {}", session.scopes());
            Ok(())
        }
        Some(CallbackOutcome::Denied(reason)) => error!("Authorization denied: {}", reason),
        None => error!("Authorization timed out."),
    }
}

fn random_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

async fn wait_for_callback(shared: &SharedCallbackState) -> Option<CallbackOutcome> {
    let start = Instant::now();
    while start.elapsed() < CALLBACK_TIMEOUT {
        if let Some(outcome) = shared.lock().await.as_ref().and_then(|s| s.outcome.clone()) {
            return Some(outcome);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    None
}
