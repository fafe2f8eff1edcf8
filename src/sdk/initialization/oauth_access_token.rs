use super::{CredentialInput, Extraction, Recognizer, non_blank};
use crate::{Error, Result};

/// A structured [`AccessToken`](super::AccessToken) object.
pub struct OAuthAccessToken;

impl Recognizer for OAuthAccessToken {
    fn name(&self) -> &'static str {
        "oauth_access_token"
    }

    fn should_apply(&self, input: &CredentialInput) -> bool {
        matches!(input, CredentialInput::Token(_))
    }

    fn extract(&self, input: &CredentialInput) -> Result<Extraction> {
        let CredentialInput::Token(token) = input else {
            return Err(Error::UnrecognizedCredentialInput);
        };

        Ok(Extraction {
            access_token: token.token.clone(),
            expires_in: token.expires_in,
            expires_at: token.expires_at,
            refresh_token: non_blank(token.refresh_token.as_deref()),
        })
    }
}
