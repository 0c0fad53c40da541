/// Local failures of a measurement call.
///
/// Errors reported by the service inside a well-formed body are not represented
/// here; they come back through `MeasureResponse::status`.
#[derive(Debug)]
pub enum HealthApiError {
    /// Connection failure, timeout or non-2xx response.
    Transport(reqwest::Error),
    /// The body was not the expected JSON document.
    Decode(serde_json::Error),
}

impl HealthApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<reqwest::Error> for HealthApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for HealthApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl std::fmt::Display for HealthApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthApiError::Transport(e) => match e.status() {
                Some(status) => write!(f, "Transport error ({}): {}", status, e),
                None => write!(f, "Transport error: {}", e),
            },
            HealthApiError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for HealthApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HealthApiError::Transport(e) => Some(e),
            HealthApiError::Decode(e) => Some(e),
        }
    }
}
