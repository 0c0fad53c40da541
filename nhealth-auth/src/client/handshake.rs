use nhealth_api::AccessCredentials;
use std::fmt;
use tracing::Instrument;
use url::Url;

use super::callback::CallbackListener;
use super::config::Settings;
use super::oauth_client::OAuthClient;
use crate::common::AuthorizationCallback;
use crate::error::AuthError;

/// Progress of one delegated authorization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    RequestIssued,
    CallbackAwaited,
    Authorized,
    TimedOut,
    Rejected,
}

impl HandshakeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Authorized | Self::TimedOut | Self::Rejected)
    }
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::RequestIssued => "request issued",
            Self::CallbackAwaited => "callback awaited",
            Self::Authorized => "authorized",
            Self::TimedOut => "timed out",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Drives request token -> user consent -> callback -> access token.
///
/// A handshake runs at most once. The callback listener it opens is closed
/// before [`Handshake::run`] returns, whatever the outcome.
pub struct Handshake {
    oauth_client: OAuthClient,
    settings: Settings,
    state: HandshakeState,
}

impl Handshake {
    pub fn new(oauth_client: OAuthClient, settings: Settings) -> Self {
        Self {
            oauth_client,
            settings,
            state: HandshakeState::Idle,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Run the handshake. `present` receives the consent page URL and must get
    /// it in front of the user; it is called once the request token is issued.
    pub async fn run<F>(&mut self, present: F) -> Result<AccessCredentials, AuthError>
    where
        F: FnOnce(&Url),
    {
        if self.state != HandshakeState::Idle {
            return Err(AuthError::AlreadyAttempted);
        }

        self.execute(present)
            .instrument(tracing::info_span!("handshake"))
            .await
    }

    async fn execute<F>(&mut self, present: F) -> Result<AccessCredentials, AuthError>
    where
        F: FnOnce(&Url),
    {
        let mut listener = match CallbackListener::bind(
            &self.settings.callback_host,
            self.settings.callback_port,
        )
        .await
        {
            Ok(listener) => listener,
            Err(e) => {
                self.transition(HandshakeState::Rejected);
                return Err(e);
            }
        };

        let result = self.authorize(&mut listener, present).await;
        listener.shutdown().await;

        match &result {
            Ok(_) => self.transition(HandshakeState::Authorized),
            Err(AuthError::Timeout(_)) => self.transition(HandshakeState::TimedOut),
            Err(e) => {
                tracing::warn!(error = %e, "Handshake rejected");
                self.transition(HandshakeState::Rejected);
            }
        }

        result
    }

    async fn authorize<F>(
        &mut self,
        listener: &mut CallbackListener,
        present: F,
    ) -> Result<AccessCredentials, AuthError>
    where
        F: FnOnce(&Url),
    {
        let request = self
            .oauth_client
            .request_token(&listener.callback_url())
            .await?;
        let authorization_url = self.oauth_client.authorization_url(&request);
        self.transition(HandshakeState::RequestIssued);

        present(&authorization_url);
        self.transition(HandshakeState::CallbackAwaited);

        let params = listener.wait(self.settings.callback_timeout()).await?;
        let callback = AuthorizationCallback::try_from(params)?;

        if callback.token != request.token() {
            tracing::warn!("Callback token does not match the outstanding request token");
            return Err(AuthError::TokenMismatch);
        }

        self.oauth_client
            .access_token(&request, &callback.verifier, callback.user_id.as_deref())
            .await
    }

    fn transition(&mut self, next: HandshakeState) {
        tracing::debug!(from = %self.state, to = %next, "Handshake state change");
        self.state = next;
    }
}
