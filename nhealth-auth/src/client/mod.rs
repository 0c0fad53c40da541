mod callback;
mod config;
mod handshake;
mod oauth_client;

pub use callback::CallbackListener;
pub use config::Settings;
pub use handshake::{Handshake, HandshakeState};
pub use oauth_client::OAuthClient;

use nhealth_api::{AccessCredentials, ConsumerCredentials};
use url::Url;

use crate::error::AuthError;

/// Run a complete handshake for `consumer` with `settings`.
pub async fn authenticate<F>(
    consumer: ConsumerCredentials,
    settings: Settings,
    present: F,
) -> Result<AccessCredentials, AuthError>
where
    F: FnOnce(&Url),
{
    settings.validate().map_err(AuthError::Configuration)?;

    let oauth_client = OAuthClient::new(consumer, &settings)?;
    Handshake::new(oauth_client, settings).run(present).await
}
