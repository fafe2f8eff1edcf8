//! Credential input detection.
//!
//! Callers hand the SDK whatever they have: a bare access token, the query
//! string or URL the platform redirected to, a decoded key-value map, or a
//! token object. Each [`Recognizer`] knows one of those shapes. Detection
//! asks every recognizer whether it applies and insists on exactly one
//! answer.

mod oauth_access_token;
mod plain_string;
mod query_hash;
mod query_string;
mod url_string;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use oauth_access_token::OAuthAccessToken;
pub use plain_string::PlainString;
pub use query_hash::QueryHash;
pub use query_string::QueryString;
pub use url_string::UrlString;

use crate::{Error, Result};

/// A credential value in one of the shapes the SDK accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialInput {
    /// A bare token, a `key=value&...` query string or a URL.
    Text(String),
    /// A decoded key-value map, e.g. parsed JSON or framework query params.
    Map(Map<String, Value>),
    /// A structured token object.
    Token(AccessToken),
    /// Anything else. No recognizer accepts it.
    Other(Value),
}

impl From<&str> for CredentialInput {
    fn from(value: &str) -> Self {
        CredentialInput::Text(value.to_string())
    }
}

impl From<String> for CredentialInput {
    fn from(value: String) -> Self {
        CredentialInput::Text(value)
    }
}

impl From<Map<String, Value>> for CredentialInput {
    fn from(value: Map<String, Value>) -> Self {
        CredentialInput::Map(value)
    }
}

impl From<AccessToken> for CredentialInput {
    fn from(value: AccessToken) -> Self {
        CredentialInput::Token(value)
    }
}

impl From<Value> for CredentialInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => CredentialInput::Text(s),
            Value::Object(map) => CredentialInput::Map(map),
            other => CredentialInput::Other(other),
        }
    }
}

/// A token object as produced by an OAuth client library or a previous
/// code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// What a recognizer pulls out of its input.
///
/// At most one of `expires_in` (seconds from now) and `expires_at` (unix
/// seconds) is normally set; when both are, `expires_at` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub refresh_token: Option<String>,
}

/// One known credential shape.
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `input` has this recognizer's shape. Must not fail.
    fn should_apply(&self, input: &CredentialInput) -> bool;

    /// Pulls the token fields out of an input this recognizer applies to.
    fn extract(&self, input: &CredentialInput) -> Result<Extraction>;
}

/// Every recognizer, each tried independently.
pub const RECOGNIZERS: [&dyn Recognizer; 5] = [
    &OAuthAccessToken,
    &QueryString,
    &UrlString,
    &PlainString,
    &QueryHash,
];

/// Runs `input` against every recognizer and extracts with the single one
/// that applies.
///
/// # Errors
///
/// - [`Error::UnrecognizedCredentialInput`] if none applies.
/// - [`Error::AmbiguousCredentialInput`] if more than one does. Recognizers
///   are written to be mutually exclusive, so this is a library defect and is
///   reported rather than resolved by picking one.
pub fn detect(input: &CredentialInput) -> Result<Extraction> {
    let matches: Vec<&dyn Recognizer> = RECOGNIZERS
        .iter()
        .copied()
        .filter(|r| r.should_apply(input))
        .collect();

    match matches.as_slice() {
        [recognizer] => {
            tracing::debug!(recognizer = recognizer.name(), "credential input recognized");
            recognizer.extract(input)
        }
        [] => Err(Error::UnrecognizedCredentialInput),
        many => Err(Error::AmbiguousCredentialInput(
            many.iter().map(|r| r.name()).collect(),
        )),
    }
}

/// Accepts JSON numbers and numeric strings alike.
pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn matching(input: &CredentialInput) -> Vec<&'static str> {
        RECOGNIZERS
            .iter()
            .filter(|r| r.should_apply(input))
            .map(|r| r.name())
            .collect()
    }

    #[test]
    fn exactly_one_recognizer_per_shape() {
        let corpus: Vec<(CredentialInput, &str)> = vec![
            ("AQBabc123_-".into(), "plain_string"),
            ("token=abc&expires_in=60".into(), "query_string"),
            ("access_token=abc&refresh_token=def".into(), "query_string"),
            ("https://localhost/callback?access_token=abc".into(), "url_string"),
            ("https://localhost:8080/#access_token=XYZ&expires_in=3600".into(), "url_string"),
            (
                AccessToken {
                    token: "abc".into(),
                    expires_in: Some(60),
                    expires_at: None,
                    refresh_token: None,
                }
                .into(),
                "oauth_access_token",
            ),
            (json!({"token": "abc"}).into(), "query_hash"),
            (json!({"access_token": "abc"}).into(), "query_hash"),
        ];

        for (input, expected) in &corpus {
            assert_eq!(matching(input), vec![*expected], "input: {input:?}");
        }
    }

    #[test]
    fn unrelated_inputs_match_nothing() {
        let corpus: Vec<CredentialInput> = vec![
            "".into(),
            "not a token!".into(),
            "token=a&access_token=b".into(),
            json!({"foo": "bar"}).into(),
            json!(42).into(),
            json!(null).into(),
            "https://[::1".into(),
        ];

        for input in &corpus {
            assert!(matching(input).is_empty(), "input: {input:?}");
            assert!(matches!(detect(input), Err(Error::UnrecognizedCredentialInput)));
        }
    }

    #[test]
    fn bare_token() {
        let extraction = detect(&"AQBabc123_-".into()).unwrap();
        assert_eq!(
            extraction,
            Extraction {
                access_token: "AQBabc123_-".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn url_fragment() {
        let extraction =
            detect(&"https://localhost:8080/#access_token=XYZ&expires_in=3600".into()).unwrap();
        assert_eq!(extraction.access_token, "XYZ");
        assert_eq!(extraction.expires_in, Some(3600));
        assert_eq!(extraction.refresh_token, None);
    }

    #[test]
    fn url_without_token_key_is_unrecognized() {
        let input = "https://localhost/callback?code=abc".into();
        assert_eq!(matching(&input), vec!["url_string"]);
        assert!(matches!(detect(&input), Err(Error::UnrecognizedCredentialInput)));
    }

    #[test]
    fn scheme_like_first_key_is_treated_as_a_url() {
        // "x:" parses as a URL scheme, so this is neither a query string nor a
        // URL with a query or fragment
        let input = "x:y=1&token=abc".into();
        assert!(matching(&input).is_empty());
        assert!(matches!(detect(&input), Err(Error::UnrecognizedCredentialInput)));
    }

    #[test]
    fn integers_from_numbers_and_strings() {
        assert_eq!(integer(&json!(3600)), Some(3600));
        assert_eq!(integer(&json!("3600")), Some(3600));
        assert_eq!(integer(&json!("soon")), None);
        assert_eq!(integer(&json!(true)), None);
    }
}
