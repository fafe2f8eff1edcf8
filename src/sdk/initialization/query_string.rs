use std::collections::HashMap;

use url::{Url, form_urlencoded};

use super::{CredentialInput, Extraction, Recognizer, non_blank};
use crate::{Error, Result};

const TOKEN_KEYS: [&str; 2] = ["token", "access_token"];

/// A `key=value&key=value` string carrying `token` or `access_token`.
///
/// Exactly one of the two token keys must be present. Absolute URLs are left
/// to [`UrlString`](super::UrlString).
pub struct QueryString;

impl QueryString {
    /// Extraction shared with the URL recognizer.
    pub(crate) fn extract_from(query: &str) -> Result<Extraction> {
        let params = parse(query);
        let key = token_key(&params).ok_or(Error::UnrecognizedCredentialInput)?;
        let access_token =
            non_blank(params.get(key).map(String::as_str)).ok_or(Error::UnrecognizedCredentialInput)?;

        Ok(Extraction {
            access_token,
            expires_in: params.get("expires_in").and_then(|v| v.trim().parse().ok()),
            expires_at: params.get("expires_at").and_then(|v| v.trim().parse().ok()),
            refresh_token: non_blank(params.get("refresh_token").map(String::as_str)),
        })
    }
}

impl Recognizer for QueryString {
    fn name(&self) -> &'static str {
        "query_string"
    }

    fn should_apply(&self, input: &CredentialInput) -> bool {
        let CredentialInput::Text(text) = input else {
            return false;
        };
        text.contains('=') && Url::parse(text).is_err() && token_key(&parse(text)).is_some()
    }

    fn extract(&self, input: &CredentialInput) -> Result<Extraction> {
        match input {
            CredentialInput::Text(text) => Self::extract_from(text),
            _ => Err(Error::UnrecognizedCredentialInput),
        }
    }
}

/// First value wins for repeated keys.
fn parse(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.trim_start_matches(['?', '#']).as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

fn token_key(params: &HashMap<String, String>) -> Option<&'static str> {
    match TOKEN_KEYS.map(|k| params.contains_key(k)) {
        [true, false] => Some(TOKEN_KEYS[0]),
        [false, true] => Some(TOKEN_KEYS[1]),
        _ => None,
    }
}
