// Types shared by the handshake steps
pub mod common;

mod client;
mod error;

pub use client::{
    authenticate, CallbackListener, Handshake, HandshakeState, OAuthClient, Settings,
};
pub use common::{AuthorizationCallback, CallbackParams, RequestCredential};
pub use error::AuthError;
