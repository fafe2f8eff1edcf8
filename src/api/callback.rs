use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::warning;

/// What the redirect delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
}

/// Handshake between the `auth` command and the callback handler.
#[derive(Debug, Clone)]
pub struct CallbackState {
    /// The `state` value sent with the authorization URL.
    pub expected_state: String,
    pub outcome: Option<CallbackOutcome>,
}

impl CallbackState {
    pub fn new(expected_state: impl Into<String>) -> Self {
        Self {
            expected_state: expected_state.into(),
            outcome: None,
        }
    }
}

pub type SharedCallbackState = Arc<Mutex<Option<CallbackState>>>;

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedCallbackState>,
) -> Html<&'static str> {
    let mut lock = shared_state.lock().await;
    let Some(state) = lock.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&state.expected_state) {
        warning!("Ignoring callback with mismatched state.");
        return Html("<h4>State mismatch. Please restart the login.</h4>");
    }

    if let Some(reason) = params.get("error") {
        state.outcome = Some(CallbackOutcome::Denied(reason.clone()));
        return Html("<h4>Authorization was denied.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            state.outcome = Some(CallbackOutcome::Code(code.clone()));
            Html("<h2>Authorization received.</h2><p>You can close this window.</p>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
