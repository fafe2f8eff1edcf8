use url::Url;

use super::{CredentialInput, Extraction, QueryString, Recognizer};
use crate::{Error, Result};

/// A URL whose query and/or fragment carries the token, such as the
/// redirect of the implicit grant (`https://host/#access_token=...`).
pub struct UrlString;

/// Query and fragment joined with `&`. Unparseable input yields an empty
/// string rather than an error.
fn query_fragment(text: &str) -> String {
    let Ok(url) = Url::parse(text) else {
        return String::new();
    };
    [url.query(), url.fragment()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("&")
}

impl Recognizer for UrlString {
    fn name(&self) -> &'static str {
        "url_string"
    }

    fn should_apply(&self, input: &CredentialInput) -> bool {
        matches!(input, CredentialInput::Text(text) if !query_fragment(text).is_empty())
    }

    fn extract(&self, input: &CredentialInput) -> Result<Extraction> {
        match input {
            CredentialInput::Text(text) => QueryString::extract_from(&query_fragment(text)),
            _ => Err(Error::UnrecognizedCredentialInput),
        }
    }
}
