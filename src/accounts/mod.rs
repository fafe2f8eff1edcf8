//! # Accounts
//!
//! Authorization against the Spotify Accounts service: the authorization
//! code flow front door ([`Accounts`]), the scope registry ([`scopes`]) and
//! the token lifecycle ([`Session`]).
//!
//! ## Flow
//!
//! 1. Build an [`Accounts`] client from [`ClientCredentials`]. Missing
//!    credentials fail here, once.
//! 2. Send the user to [`Accounts::authorize_url`].
//! 3. Exchange the `code` delivered to the redirect URI with
//!    [`Accounts::exchange_for_session`].
//! 4. Use the [`Session`] with [`Sdk`](crate::sdk::Sdk), refreshing it when
//!    [`Session::expired`] says so.
//!
//! ```rust,ignore
//! let accounts = Arc::new(Accounts::from_env()?);
//! let url = accounts.authorize_url(&[])?;
//! // ... user authorizes, redirect delivers `code` ...
//! let session = accounts.exchange_for_session(&code).await?;
//! ```

pub mod scopes;
mod session;
mod token;

use std::{fmt, sync::Arc};

use url::Url;

pub use scopes::{SCOPES, ScopeSet};
pub use session::{RefreshHook, SerializedSession, Session, TokenSet};
pub use token::TokenResponse;

use crate::{Error, Result, config};

/// Client credentials as registered with the platform.
///
/// Fields are optional so a partially-known set can exist while it is being
/// assembled (for instance from the environment). [`ClientCredentials::validate`]
/// is the gate every authorization operation goes through.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            redirect_uri: Some(redirect_uri.into()),
        }
    }

    /// Credentials read from `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_REDIRECT_URI`.
    pub fn from_env() -> Self {
        Self::default().or_env()
    }

    /// Fills the fields that are still unset from the environment. Fields
    /// given explicitly are never replaced.
    pub fn or_env(self) -> Self {
        Self {
            client_id: self.client_id.or_else(config::spotify_client_id),
            client_secret: self.client_secret.or_else(config::spotify_client_secret),
            redirect_uri: self.redirect_uri.or_else(config::spotify_redirect_uri),
        }
    }

    /// Checks that all three fields are present and non-blank.
    pub fn validate(&self) -> Result<()> {
        required(&self.client_id, "client id")?;
        required(&self.client_secret, "client secret")?;
        required(&self.redirect_uri, "redirect uri")?;
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[redacted]"))
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::InvalidClientCredentials(name)),
    }
}

/// Base URLs of the two hosts the library talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub accounts_url: String,
    pub api_url: String,
}

impl Endpoints {
    /// Endpoints pointing at custom hosts, e.g. a local stub server.
    pub fn new(accounts_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            accounts_url: trim_base(accounts_url.into()),
            api_url: trim_base(api_url.into()),
        }
    }

    /// Endpoints from `SPOTIFY_ACCOUNTS_URL` / `SPOTIFY_API_URL`, falling back
    /// to the public hosts.
    pub fn from_env() -> Self {
        Self::new(config::spotify_accounts_url(), config::spotify_api_url())
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(config::DEFAULT_ACCOUNTS_URL, config::DEFAULT_API_URL)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Validated client for the authorization code flow.
///
/// Holds the credentials, the endpoints and the HTTP client shared by every
/// [`Session`] created from it. Sessions keep an `Arc<Accounts>` so one client
/// can back sessions for several users.
#[derive(Clone)]
pub struct Accounts {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: Endpoints,
    http: reqwest::Client,
}

impl Accounts {
    /// Builds a client, failing with [`Error::InvalidClientCredentials`] if any
    /// credential is missing or blank.
    pub fn new(credentials: ClientCredentials) -> Result<Self> {
        credentials.validate()?;
        Ok(Self {
            client_id: required(&credentials.client_id, "client id")?.to_string(),
            client_secret: required(&credentials.client_secret, "client secret")?.to_string(),
            redirect_uri: required(&credentials.redirect_uri, "redirect uri")?.to_string(),
            endpoints: Endpoints::default(),
            http: reqwest::Client::new(),
        })
    }

    /// Builds a client from the environment, both credentials and endpoints.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientCredentials::from_env())?.with_endpoints(Endpoints::from_env()))
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Builds the URL the user is sent to in order to grant access.
    ///
    /// The query carries `client_id`, `redirect_uri`, `response_type=code` and
    /// `scope` (every registered scope), followed by `overrides`. An override
    /// replaces the default with the same key; new keys (such as `state` or
    /// `show_dialog`) are appended. Override scopes are not validated.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let url = accounts.authorize_url(&[("scope", "user-read-email streaming"), ("state", "xyz")])?;
    /// ```
    pub fn authorize_url(&self, overrides: &[(&str, &str)]) -> Result<Url> {
        let all = scopes::all_scopes();
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", all.as_str()),
        ];
        for &(key, value) in overrides {
            match params.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => params.push((key, value)),
            }
        }

        Ok(Url::parse_with_params(&self.endpoints.authorize_url(), &params)?)
    }

    /// Exchanges an authorization code for a new [`Session`].
    ///
    /// Authorization codes are single-use, so a failed exchange is never
    /// retried. An error body from the token endpoint becomes
    /// [`Error::AuthorizationExchange`]; no partial session is ever returned.
    pub async fn exchange_for_session(self: &Arc<Self>, code: &str) -> Result<Session> {
        let response = token::request_token(
            &self.http,
            &self.endpoints.token_url(),
            &[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
            ],
        )
        .await?;

        let session = Session::from_token_response(Arc::clone(self), response);
        tracing::info!(
            scopes = session.token_set().scopes.len(),
            "authorization code exchanged for session"
        );
        Ok(session)
    }
}

impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounts")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
