use serde_json::{Map, Value};

use super::{CredentialInput, Extraction, Recognizer, integer, non_blank};
use crate::{Error, Result};

/// A key-value map with an `access_token` (or `token`) entry. Only the
/// recognized fields are read; everything else in the map is ignored.
pub struct QueryHash;

fn token_value(map: &Map<String, Value>) -> Option<&Value> {
    map.get("access_token").or_else(|| map.get("token"))
}

impl Recognizer for QueryHash {
    fn name(&self) -> &'static str {
        "query_hash"
    }

    fn should_apply(&self, input: &CredentialInput) -> bool {
        matches!(input, CredentialInput::Map(map) if token_value(map).is_some())
    }

    fn extract(&self, input: &CredentialInput) -> Result<Extraction> {
        let CredentialInput::Map(map) = input else {
            return Err(Error::UnrecognizedCredentialInput);
        };

        let access_token = non_blank(token_value(map).and_then(Value::as_str))
            .ok_or(Error::UnrecognizedCredentialInput)?;

        Ok(Extraction {
            access_token,
            expires_in: map.get("expires_in").and_then(integer),
            expires_at: map.get("expires_at").and_then(integer),
            refresh_token: non_blank(map.get("refresh_token").and_then(Value::as_str)),
        })
    }
}
