//! Configuration management for the Spotify SDK and its companion CLI.
//!
//! Values are read from environment variables, optionally seeded from a `.env`
//! file in the local data directory. The hierarchy is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults (endpoints and the callback server address)
//!
//! Credentials have no default. A missing credential surfaces as
//! [`Error::InvalidClientCredentials`](crate::Error::InvalidClientCredentials)
//! when an [`Accounts`](crate::accounts::Accounts) client is built from them.

use std::{env, path::PathBuf};

use tracing_subscriber::EnvFilter;

use crate::Result;

/// Host serving `/authorize` and `/api/token`.
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Host serving the `/v1/...` Web API resources.
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Bind address of the local OAuth callback server.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

const APP_DIR: &str = "spotify-sdk";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist and loads variables from
/// `spotify-sdk/.env` inside the platform-specific local data directory:
/// - Linux: `~/.local/share/spotify-sdk/.env`
/// - macOS: `~/Library/Application Support/spotify-sdk/.env`
/// - Windows: `%LOCALAPPDATA%/spotify-sdk/.env`
///
/// A missing `.env` file is not an error; configuration may come from the
/// process environment alone. Variables that are already set are not
/// overwritten.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
///
/// # Example
///
/// ```
/// use spotify_sdk::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        if let Err(e) = dotenv::from_path(&path) {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable .env file");
        }
    }
    Ok(())
}

/// Installs the global `tracing` subscriber used by the CLI.
///
/// Honors `RUST_LOG`; defaults to `warn` so library events stay quiet unless
/// asked for. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the Spotify application client ID.
///
/// Reads `SPOTIFY_CLIENT_ID`. Blank values count as unset.
///
/// # Example
///
/// ```
/// let client_id = spotify_client_id(); // e.g., Some("abc123...")
/// ```
pub fn spotify_client_id() -> Option<String> {
    non_empty_var("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify application client secret.
///
/// Reads `SPOTIFY_CLIENT_SECRET`. Blank values count as unset.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> Option<String> {
    non_empty_var("SPOTIFY_CLIENT_SECRET")
}

/// Returns the OAuth redirect URI registered for the application.
///
/// Reads `SPOTIFY_REDIRECT_URI`. For the CLI this must point at the local
/// callback server, e.g. `http://127.0.0.1:8888/callback`.
pub fn spotify_redirect_uri() -> Option<String> {
    non_empty_var("SPOTIFY_REDIRECT_URI")
}

/// Returns the accounts service base URL (`SPOTIFY_ACCOUNTS_URL`).
pub fn spotify_accounts_url() -> String {
    non_empty_var("SPOTIFY_ACCOUNTS_URL").unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.to_string())
}

/// Returns the Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_api_url() -> String {
    non_empty_var("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the bind address for the local OAuth callback server.
///
/// Reads `SERVER_ADDRESS`, falling back to [`DEFAULT_SERVER_ADDRESS`].
pub fn server_addr() -> String {
    non_empty_var("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Root of the CLI's local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Where the CLI keeps the serialized session.
pub fn session_path() -> PathBuf {
    data_dir().join("cache/session.json")
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
