use nhealth_api::HealthApiError;
use nhealth_auth::AuthError;
use std::process::ExitCode;
use thiserror::Error;

/// Failure classes reported to the shell through distinct exit statuses.
#[derive(Error, Debug)]
pub enum Failure {
    #[error("Error parsing arguments: {0}")]
    Arguments(String),

    #[error("API key and API secret arguments are required")]
    MissingCredentials,

    #[error("Error fetching access tokens: {0}")]
    Handshake(#[from] AuthError),

    #[error("Error fetching measurement data: {0}")]
    Query(#[from] HealthApiError),

    #[error("Measurement request failed with status {status}: {message}")]
    RemoteStatus { status: u32, message: String },
}

impl Failure {
    pub fn code(&self) -> u8 {
        match self {
            Failure::Arguments(_) => 255,
            Failure::MissingCredentials => 254,
            Failure::Handshake(_) => 253,
            Failure::Query(_) | Failure::RemoteStatus { .. } => 252,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
