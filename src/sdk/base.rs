//! Request envelope shared by every SDK component.
//!
//! Components never build HTTP requests themselves. They hand a method, a
//! path and options to [`Envelope::send`], which attaches the session's bearer
//! token, decodes the body and turns upstream errors into [`Error`] values.

use std::sync::Arc;

use reqwest::Method;
use serde_json::{Map, Value};

use crate::{Error, Result, accounts::Session};

/// Per-call knobs for [`Envelope::send`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Treat an empty body as success ([`Response::Empty`]).
    pub expect_empty: bool,
    /// Skip decoding and hand back the transport response as-is.
    pub raw: bool,
    /// Extra query parameters, appended in order.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn expect_empty() -> Self {
        Self {
            expect_empty: true,
            ..Default::default()
        }
    }

    pub fn raw() -> Self {
        Self {
            raw: true,
            ..Default::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Outcome of a successful call.
#[derive(Debug)]
pub enum Response {
    /// Decoded JSON body with snake_case keys.
    Json(Value),
    /// Empty body on a call that declared [`RequestOptions::expect_empty`].
    Empty,
    /// Undecoded transport response, for [`RequestOptions::raw`] calls.
    Raw(reqwest::Response),
}

impl Response {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Response::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }
}

/// Sends authenticated requests on behalf of one [`Session`].
#[derive(Debug, Clone)]
pub struct Envelope {
    session: Arc<Session>,
}

impl Envelope {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Issues `method path` against the Web API with the bearer header set
    /// from the current session.
    ///
    /// `path` is relative to the API host, e.g. `/v1/me`. The error check runs
    /// before the empty-body check, so an error payload is never mistaken for
    /// a successful empty response.
    ///
    /// # Errors
    ///
    /// - [`Error::ApiRequest`] when the decoded body is an object with an
    ///   `error` key, or when the status is not 2xx whatever the body.
    /// - [`Error::UnexpectedEmptyResponse`] for an empty body without
    ///   [`RequestOptions::expect_empty`].
    /// - [`Error::Http`] / [`Error::Decode`] for transport and JSON failures.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Response> {
        let accounts = self.session.accounts();
        let url = format!("{}{}", accounts.endpoints().api_url, path);
        tracing::debug!(%method, %url, "api request");

        let bodyless_write = body.is_none() && method != Method::GET;
        let mut request = accounts
            .http()
            .request(method, &url)
            .bearer_auth(self.session.access_token());
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = body {
            request = request.json(body);
        } else if bodyless_write {
            // the API answers 411 to a bodyless PUT/POST without a length
            request = request.header(reqwest::header::CONTENT_LENGTH, 0);
        }

        let response = request.send().await?;
        if options.raw {
            return Ok(Response::Raw(response));
        }

        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_body(status, &text, options.expect_empty)
    }

    /// GET returning the decoded JSON body.
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.send(Method::GET, path, None, options)
            .await?
            .into_json()
            .ok_or(Error::UnexpectedEmptyResponse)
    }

    /// Call whose success carries no content (playback controls, follows).
    /// A non-empty success body is accepted and dropped.
    pub async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<()> {
        let options = RequestOptions {
            expect_empty: true,
            ..options
        };
        self.send(method, path, body, options).await.map(|_| ())
    }
}

fn decode_body(status: u16, text: &str, expect_empty: bool) -> Result<Response> {
    let success = (200..300).contains(&status);
    let decoded = if text.trim().is_empty() {
        None
    } else {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Some(normalize_keys(value)),
            Err(e) if success => return Err(e.into()),
            Err(_) => None,
        }
    };

    if let Some(error) = decoded.as_ref().and_then(|v| v.get("error")) {
        let message = error_message(error, decoded.as_ref());
        tracing::debug!(status, error = %message, "api returned error payload");
        return Err(Error::ApiRequest { status, message });
    }

    if !success {
        let message = match text.trim() {
            "" => reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("unexpected status")
                .to_string(),
            body => body.to_string(),
        };
        tracing::debug!(status, error = %message, "api returned failure status");
        return Err(Error::ApiRequest { status, message });
    }

    match decoded {
        Some(value) => Ok(Response::Json(value)),
        None if expect_empty => Ok(Response::Empty),
        None => Err(Error::UnexpectedEmptyResponse),
    }
}

/// `{"error": {"status": 401, "message": "..."}}` for the Web API,
/// `{"error": "...", "error_description": "..."}` for the accounts service.
fn error_message(error: &Value, body: Option<&Value>) -> String {
    match error {
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        Value::String(code) => body
            .and_then(|b| b.get("error_description"))
            .and_then(Value::as_str)
            .unwrap_or(code)
            .to_string(),
        other => other.to_string(),
    }
}

/// Rewrites every object key to snake_case, recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (snake_case(&k), normalize_keys(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c == '-' || c == ' ' {
            out.push('_');
        } else if c.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_become_snake_case() {
        assert_eq!(snake_case("displayName"), "display_name");
        assert_eq!(snake_case("external_urls"), "external_urls");
        assert_eq!(snake_case("Content-Type"), "content_type");
        assert_eq!(snake_case("track2Name"), "track2_name");
        assert_eq!(snake_case("ID"), "id");
    }

    #[test]
    fn normalization_is_recursive() {
        let value = normalize_keys(json!({
            "isActive": true,
            "items": [{"durationMs": 1}],
            "externalUrls": {"spotify": "x"}
        }));
        assert_eq!(
            value,
            json!({
                "is_active": true,
                "items": [{"duration_ms": 1}],
                "external_urls": {"spotify": "x"}
            })
        );
    }

    #[test]
    fn error_object_wins_over_everything() {
        let body = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        for expect_empty in [false, true] {
            match decode_body(401, body, expect_empty) {
                Err(Error::ApiRequest { status, message }) => {
                    assert_eq!(status, 401);
                    assert_eq!(message, "The access token expired");
                }
                other => panic!("unexpected: {other:?}"),
            }
        }
    }

    #[test]
    fn string_error_uses_description() {
        let body = r#"{"error": "invalid_client", "error_description": "Invalid client"}"#;
        assert!(matches!(
            decode_body(400, body, false),
            Err(Error::ApiRequest { message, .. }) if message == "Invalid client"
        ));
    }

    #[test]
    fn empty_body_depends_on_expectation() {
        assert!(decode_body(204, "", true).unwrap().is_empty());
        assert!(matches!(
            decode_body(204, "", false),
            Err(Error::UnexpectedEmptyResponse)
        ));
    }

    #[test]
    fn failure_status_without_error_key_is_an_error() {
        for expect_empty in [false, true] {
            assert!(matches!(
                decode_body(503, "", expect_empty),
                Err(Error::ApiRequest { status: 503, message }) if message == "Service Unavailable"
            ));
        }
        assert!(matches!(
            decode_body(429, r#"{"retry": true}"#, true),
            Err(Error::ApiRequest { status: 429, message }) if message == r#"{"retry": true}"#
        ));
    }

    #[test]
    fn failure_status_with_html_body_is_an_api_error() {
        assert!(matches!(
            decode_body(502, "<html>Bad Gateway</html>", true),
            Err(Error::ApiRequest { status: 502, message }) if message == "<html>Bad Gateway</html>"
        ));
    }

    #[test]
    fn json_body_is_returned() {
        let response = decode_body(200, r#"{"id": "abc"}"#, false).unwrap();
        assert_eq!(response.into_json(), Some(json!({"id": "abc"})));
    }

    #[test]
    fn garbage_body_is_decode_error() {
        assert!(matches!(decode_body(200, "<html>", false), Err(Error::Decode(_))));
    }
}
