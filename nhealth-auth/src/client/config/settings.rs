use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_REQUEST_TOKEN_URL: &str = "https://developer.health.nokia.com/account/request_token";
const DEFAULT_AUTHORIZE_URL: &str = "https://developer.health.nokia.com/account/authorize";
const DEFAULT_ACCESS_TOKEN_URL: &str = "https://developer.health.nokia.com/account/access_token";

/// Handshake endpoints and local callback receiver settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_callback_host")]
    pub callback_host: String,

    /// 0 picks a free port.
    #[serde(default = "default_callback_port")]
    pub callback_port: u16,

    #[serde(default = "default_callback_timeout")]
    pub callback_timeout_secs: u64,

    #[serde(default = "default_request_token_url")]
    pub request_token_url: String,

    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    #[serde(default = "default_access_token_url")]
    pub access_token_url: String,
}

fn default_callback_host() -> String {
    "localhost".to_string()
}

fn default_callback_port() -> u16 {
    9002
}

fn default_callback_timeout() -> u64 {
    30
}

fn default_request_token_url() -> String {
    DEFAULT_REQUEST_TOKEN_URL.to_string()
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

fn default_access_token_url() -> String {
    DEFAULT_ACCESS_TOKEN_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            callback_host: default_callback_host(),
            callback_port: default_callback_port(),
            callback_timeout_secs: default_callback_timeout(),
            request_token_url: default_request_token_url(),
            authorize_url: default_authorize_url(),
            access_token_url: default_access_token_url(),
        }
    }
}

impl Settings {
    /// Load `nhutil.toml` (or the file named by `NHUTIL_CONFIG`) and `NHUTIL_*`
    /// environment variables on top of the defaults.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("NHUTIL_CONFIG").unwrap_or_else(|_| "nhutil.toml".to_string());
        Self::load(&config_path)
    }

    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("NHUTIL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.callback_host.is_empty() {
            return Err("callback_host is required".to_string());
        }
        if self.callback_timeout_secs == 0 {
            return Err("callback_timeout_secs must be greater than zero".to_string());
        }
        for (name, url) in [
            ("request_token_url", &self.request_token_url),
            ("authorize_url", &self.authorize_url),
            ("access_token_url", &self.access_token_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{} must be a valid HTTP(S) URL", name));
            }
        }
        Ok(())
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }
}
