//! Error types shared by the accounts, session and SDK layers.

/// Errors surfaced by the library.
///
/// Nothing in the library panics or exits on failure; every variant is handed
/// back to the caller, who decides whether to retry, re-authorize or give up.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid client credentials: missing {0}")]
    InvalidClientCredentials(&'static str),

    #[error("credential input matches no known shape")]
    UnrecognizedCredentialInput,

    /// More than one recognizer claimed the input. The recognizers are meant
    /// to be mutually exclusive, so this points at a bug in the library.
    #[error("credential input matches several shapes: {}", .0.join(", "))]
    AmbiguousCredentialInput(Vec<&'static str>),

    #[error("authorization code exchange failed: {0}")]
    AuthorizationExchange(String),

    #[error("cannot refresh a session without a refresh token")]
    MissingRefreshToken,

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("api request failed ({status}): {message}")]
    ApiRequest { status: u16, message: String },

    #[error("api returned an empty body where content was expected")]
    UnexpectedEmptyResponse,

    #[error("invalid resource payload: {0}")]
    InvalidModel(&'static str),

    #[error("invalid playback command: {0}")]
    InvalidPlaybackCommand(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
