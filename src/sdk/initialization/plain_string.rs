use std::sync::LazyLock;

use regex::Regex;

use super::{CredentialInput, Extraction, Recognizer};
use crate::{Error, Result};

static BARE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("bare token pattern is valid"));

/// A bare access token with no separators, e.g. `AQBabc123_-`.
pub struct PlainString;

impl Recognizer for PlainString {
    fn name(&self) -> &'static str {
        "plain_string"
    }

    fn should_apply(&self, input: &CredentialInput) -> bool {
        matches!(input, CredentialInput::Text(text) if BARE_TOKEN.is_match(text))
    }

    fn extract(&self, input: &CredentialInput) -> Result<Extraction> {
        match input {
            CredentialInput::Text(text) if BARE_TOKEN.is_match(text) => Ok(Extraction {
                access_token: text.clone(),
                ..Default::default()
            }),
            _ => Err(Error::UnrecognizedCredentialInput),
        }
    }
}
