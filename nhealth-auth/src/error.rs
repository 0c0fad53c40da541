use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Mismatched request and response tokens")]
    TokenMismatch,

    #[error("Timeout awaiting OAuth response after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("Callback listener error: {0}")]
    Listener(#[source] std::io::Error),

    #[error("Handshake already attempted")]
    AlreadyAttempted,
}

impl AuthError {
    /// Malformed or unexpected protocol data, including a token mismatch.
    pub fn is_protocol(&self) -> bool {
        matches!(self, AuthError::Protocol(_) | AuthError::TokenMismatch)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AuthError::Timeout(_))
    }
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
