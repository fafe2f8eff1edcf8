//! Token endpoint wire format.
//!
//! Both the authorization code exchange and the refresh grant POST a form to
//! `{accounts}/api/token` and get back either a token body or an
//! `{error, error_description}` pair.

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Successful token endpoint body.
///
/// `expires_in` is a delta in seconds from the response time; the session
/// turns it into an absolute timestamp once, on receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absent on refresh when the platform keeps the old refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Value,
    #[serde(default)]
    error_description: Option<String>,
}

/// POSTs `form` to the token endpoint and decodes the answer.
///
/// An error-shaped body becomes [`Error::AuthorizationExchange`] carrying the
/// upstream description, whatever the HTTP status was.
pub(crate) async fn request_token(
    client: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let grant = form
        .iter()
        .find(|(k, _)| *k == "grant_type")
        .map(|(_, v)| *v)
        .unwrap_or_default();
    tracing::debug!(url = token_url, grant, "requesting token");

    let response = client.post(token_url).form(form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    parse_token_body(status.as_u16(), &body)
}

fn parse_token_body(status: u16, body: &str) -> Result<TokenResponse> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        Error::AuthorizationExchange(format!("token endpoint returned {status}: {e}"))
    })?;

    if json.get("error").is_some() {
        let err: TokenErrorResponse = serde_json::from_value(json)?;
        let description = err.error_description.unwrap_or_else(|| match err.error {
            Value::String(s) => s,
            other => other.to_string(),
        });
        return Err(Error::AuthorizationExchange(description));
    }

    Ok(serde_json::from_value(json)?)
}
