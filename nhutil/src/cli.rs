use clap::Parser;
use nhealth_api::{AccessCredentials, ConsumerCredentials};
use std::path::PathBuf;

use crate::failure::Failure;

#[derive(Debug, Clone, Parser)]
#[command(name = "nhutil", version, about = "Nokia Health API util")]
pub struct Args {
    /// Health API key
    #[arg(short = 'k', long, env = "NOKIA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Health API secret
    #[arg(short = 's', long, env = "NOKIA_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Health user ID
    #[arg(short = 'u', long, env = "NOKIA_USER_ID")]
    pub user_id: Option<u64>,

    /// Health user access token
    #[arg(short = 't', long, env = "NOKIA_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Health user access secret
    #[arg(short = 'a', long, env = "NOKIA_ACCESS_SECRET", hide_env_values = true)]
    pub access_secret: Option<String>,

    /// Port for local interface binding (overrides the configured callback port)
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Number of days of weight measurements to fetch
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(1..))]
    pub days: i64,

    /// Print the authorization link without opening a browser
    #[arg(long)]
    pub no_browser: bool,

    /// Print the raw decoded response as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, env = "NOKIA_API_BASE_URL", hide = true)]
    pub api_base_url: Option<String>,
}

impl Args {
    pub fn consumer(&self) -> Result<ConsumerCredentials, Failure> {
        match (non_empty(&self.api_key), non_empty(&self.api_secret)) {
            (Some(key), Some(secret)) => Ok(ConsumerCredentials::new(key, secret)),
            _ => Err(Failure::MissingCredentials),
        }
    }

    /// Pre-existing user credentials, if all three parts were supplied.
    pub fn access(&self) -> Option<AccessCredentials> {
        let user_id = self.user_id?;
        let token = non_empty(&self.access_token)?;
        let secret = non_empty(&self.access_secret)?;
        Some(AccessCredentials::new(user_id, token, secret))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
