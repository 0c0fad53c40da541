use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::AuthError;

/// Temporary credential for one handshake attempt.
#[derive(Debug)]
pub struct RequestCredential {
    token: String,
    secret: SecretString,
}

impl RequestCredential {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

/// Raw query of the authorization redirect, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
    pub userid: Option<String>,
}

/// Validated authorization redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
    pub token: String,
    pub verifier: String,
    pub user_id: Option<String>,
}

impl TryFrom<CallbackParams> for AuthorizationCallback {
    type Error = AuthError;

    fn try_from(params: CallbackParams) -> Result<Self, Self::Error> {
        let token = params
            .oauth_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::Protocol("callback missing oauth_token".to_string()))?;
        let verifier = params
            .oauth_verifier
            .filter(|verifier| !verifier.is_empty())
            .ok_or_else(|| AuthError::Protocol("callback missing oauth_verifier".to_string()))?;

        Ok(Self {
            token,
            verifier,
            user_id: params.userid.filter(|user_id| !user_id.is_empty()),
        })
    }
}
