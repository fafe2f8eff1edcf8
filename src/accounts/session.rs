use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Accounts, ScopeSet, token, token::TokenResponse};
use crate::{
    Error, Result,
    sdk::initialization::{self, CredentialInput, Extraction},
};

/// The canonical token triple plus the scopes granted with it.
///
/// `expires_at` is absolute and computed once, when the token is received.
/// `None` means the expiry was never known, not that the token never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub scopes: ScopeSet,
}

impl TokenSet {
    /// Creates a token set, anchoring `expires_in` (seconds) to the current time.
    pub fn new(
        access_token: impl Into<String>,
        expires_in: Option<i64>,
        refresh_token: Option<String>,
        scopes: ScopeSet,
    ) -> Self {
        let issued_at = Utc::now();
        Self {
            access_token: access_token.into(),
            expires_at: expires_in.and_then(|secs| expires_at_from(issued_at, secs)),
            refresh_token: refresh_token.filter(|t| !t.trim().is_empty()),
            scopes,
        }
    }

    /// `None` when the expiry is unknown, otherwise whether `now` is past it.
    pub fn expired_at(&self, now: DateTime<Utc>) -> Option<bool> {
        self.expires_at.map(|at| now > at)
    }

    pub fn expired(&self) -> Option<bool> {
        self.expired_at(Utc::now())
    }
}

/// Whole seconds, so the value survives [`SerializedSession`] unchanged.
pub(crate) fn expires_at_from(issued_at: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(issued_at.timestamp().checked_add(expires_in)?, 0)
}

/// Storage form of a session, for callers that persist tokens.
///
/// Blank strings are written as `null`, so a restored session can tell
/// "never had a value" apart from any value it did have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedSession {
    pub access_token: Option<String>,
    /// Unix timestamp in seconds.
    pub expires_at: Option<i64>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Callback invoked with the new state after every successful refresh.
pub type RefreshHook = Box<dyn Fn(&SerializedSession) + Send + Sync>;

/// One user's authorization: a [`TokenSet`] and the [`Accounts`] client
/// needed to refresh it.
///
/// The token set sits behind a lock as an `Arc` and a refresh replaces it in
/// a single swap, so readers always see a complete token set, old or new.
/// Concurrent refreshes of the same session are not coordinated; callers
/// that share a session across tasks should allow one refresh at a time.
pub struct Session {
    accounts: Arc<Accounts>,
    tokens: RwLock<Arc<TokenSet>>,
    on_refresh: Option<RefreshHook>,
}

impl Session {
    pub fn new(
        accounts: Arc<Accounts>,
        access_token: impl Into<String>,
        expires_in: Option<i64>,
        refresh_token: Option<String>,
        scopes: ScopeSet,
    ) -> Self {
        Self::from_token_set(
            accounts,
            TokenSet::new(access_token, expires_in, refresh_token, scopes),
        )
    }

    pub fn from_token_set(accounts: Arc<Accounts>, tokens: TokenSet) -> Self {
        Self {
            accounts,
            tokens: RwLock::new(Arc::new(tokens)),
            on_refresh: None,
        }
    }

    /// A session that only knows its refresh token. Call [`Session::refresh`]
    /// before using it for requests.
    pub fn from_refresh_token(accounts: Arc<Accounts>, refresh_token: impl Into<String>) -> Self {
        Self::new(accounts, String::new(), None, Some(refresh_token.into()), ScopeSet::default())
    }

    /// Builds a session from any supported credential shape: a bare token, a
    /// query string, a redirect URL, a key-value map or a token object.
    ///
    /// # Errors
    ///
    /// [`Error::UnrecognizedCredentialInput`] when no shape matches and
    /// [`Error::AmbiguousCredentialInput`] when several do.
    pub fn detect(accounts: Arc<Accounts>, input: impl Into<CredentialInput>) -> Result<Self> {
        let extraction = initialization::detect(&input.into())?;
        Ok(Self::from_extraction(accounts, extraction))
    }

    /// Rebuilds a session from [`Session::serialize`] output.
    pub fn restore(accounts: Arc<Accounts>, stored: SerializedSession) -> Self {
        Self::from_token_set(
            accounts,
            TokenSet {
                access_token: stored.access_token.unwrap_or_default(),
                expires_at: stored
                    .expires_at
                    .and_then(|secs| DateTime::from_timestamp(secs, 0)),
                refresh_token: stored.refresh_token.filter(|t| !t.trim().is_empty()),
                scopes: stored.scopes.iter().collect(),
            },
        )
    }

    pub(crate) fn from_token_response(accounts: Arc<Accounts>, response: TokenResponse) -> Self {
        let scopes = response
            .scope
            .as_deref()
            .map(ScopeSet::parse)
            .unwrap_or_default();
        Self::new(
            accounts,
            response.access_token,
            response.expires_in,
            response.refresh_token,
            scopes,
        )
    }

    fn from_extraction(accounts: Arc<Accounts>, extraction: Extraction) -> Self {
        let mut tokens = TokenSet::new(
            extraction.access_token,
            extraction.expires_in,
            extraction.refresh_token,
            ScopeSet::default(),
        );
        // an unrepresentable timestamp keeps the expiry derived from expires_in
        if let Some(at) = extraction.expires_at.and_then(|at| DateTime::from_timestamp(at, 0)) {
            tokens.expires_at = Some(at);
        }
        Self::from_token_set(accounts, tokens)
    }

    /// Registers a callback that receives the serialized session after each
    /// successful refresh, e.g. to write it back to durable storage.
    pub fn with_refresh_hook(
        mut self,
        hook: impl Fn(&SerializedSession) + Send + Sync + 'static,
    ) -> Self {
        self.on_refresh = Some(Box::new(hook));
        self
    }

    pub fn accounts(&self) -> &Arc<Accounts> {
        &self.accounts
    }

    /// Snapshot of the current token set.
    pub fn token_set(&self) -> Arc<TokenSet> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> String {
        self.token_set().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.token_set().refresh_token.clone()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token_set().expires_at
    }

    pub fn scopes(&self) -> ScopeSet {
        self.token_set().scopes.clone()
    }

    /// `None` when the expiry is unknown.
    pub fn expired(&self) -> Option<bool> {
        self.token_set().expired()
    }

    /// Case-insensitive scope check.
    pub fn contains_scope(&self, scope: &str) -> bool {
        self.token_set().scopes.contains(scope)
    }

    /// Refreshes the access token with the refresh grant.
    ///
    /// Returns `Ok(true)` once the new token set is in place and `Ok(false)`
    /// when the refresh failed for any transport or upstream reason, in which
    /// case the current token set is left exactly as it was and a later retry
    /// is safe. A refresh token missing from the response means the old one
    /// stays valid.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRefreshToken`] if the session has no refresh token.
    pub async fn refresh(&self) -> Result<bool> {
        match self.try_refresh().await {
            Ok(()) => Ok(true),
            Err(Error::MissingRefreshToken) => Err(Error::MissingRefreshToken),
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed, keeping current token");
                Ok(false)
            }
        }
    }

    /// Like [`Session::refresh`], but reports a failed refresh as
    /// [`Error::RefreshFailed`] instead of `Ok(false)`.
    pub async fn try_refresh(&self) -> Result<()> {
        let current = self.token_set();
        let refresh_token = current
            .refresh_token
            .as_deref()
            .ok_or(Error::MissingRefreshToken)?;

        let response = token::request_token(
            self.accounts.http(),
            &self.accounts.endpoints().token_url(),
            &[
                ("client_id", self.accounts.client_id()),
                ("client_secret", self.accounts.client_secret()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
        .map_err(|e| Error::RefreshFailed(e.to_string()))?;

        let mut next = TokenSet::new(
            response.access_token,
            response.expires_in,
            response.refresh_token,
            response
                .scope
                .as_deref()
                .map(ScopeSet::parse)
                .unwrap_or_else(|| current.scopes.clone()),
        );
        if next.refresh_token.is_none() {
            next.refresh_token = current.refresh_token.clone();
        }

        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        tracing::info!(expires_at = ?self.expires_at(), "session refreshed");

        if let Some(hook) = &self.on_refresh {
            hook(&self.serialize());
        }
        Ok(())
    }

    pub fn serialize(&self) -> SerializedSession {
        let tokens = self.token_set();
        SerializedSession {
            access_token: present(&tokens.access_token),
            expires_at: tokens.expires_at.map(|at| at.timestamp()),
            refresh_token: tokens.refresh_token.as_deref().and_then(present),
            scopes: tokens.scopes.to_vec(),
        }
    }
}

fn present(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self.token_set();
        f.debug_struct("Session")
            .field("expires_at", &tokens.expires_at)
            .field("has_refresh_token", &tokens.refresh_token.is_some())
            .field("scopes", &tokens.scopes)
            .finish_non_exhaustive()
    }
}
