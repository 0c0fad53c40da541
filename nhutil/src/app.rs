use chrono::Utc;
use nhealth_api::{AccessCredentials, Client, MeasureQuery, MeasureType};
use nhealth_auth::{AuthError, Settings};
use url::Url;

use crate::cli::Args;
use crate::failure::Failure;
use crate::report;

pub struct App {
    args: Args,
}

impl App {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    pub async fn run(&self) -> Result<(), Failure> {
        // Fail fast before any network traffic
        self.args.consumer()?;

        let access = match self.args.access() {
            Some(access) => access,
            None => {
                println!("No user id, access token or secret supplied, performing OAuth exchange...");
                let access = self.authorize().await?;
                println!(
                    "User ID: {} Access token: {} Access secret: {}",
                    access.user_id(),
                    access.token(),
                    access.secret()
                );
                access
            }
        };

        tracing::info!(user_id = access.user_id(), "Fetching measurements");
        let response = self.fetch_measurements(&access).await?;

        if self.args.json {
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::warn!(error = %e, "Failed to encode response"),
            }
        } else {
            print!("{}", report::render(&response));
        }

        if !response.is_success() {
            return Err(Failure::RemoteStatus {
                status: response.status,
                message: response.message,
            });
        }

        Ok(())
    }

    async fn authorize(&self) -> Result<AccessCredentials, Failure> {
        let mut settings = Settings::new().map_err(AuthError::from)?;
        if let Some(port) = self.args.port {
            settings.callback_port = port;
        }

        let open_browser = !self.args.no_browser;
        let access = nhealth_auth::authenticate(self.args.consumer()?, settings, |url| {
            present_authorization_url(url, open_browser)
        })
        .await?;

        Ok(access)
    }

    async fn fetch_measurements(
        &self,
        access: &AccessCredentials,
    ) -> Result<nhealth_api::MeasureResponse, Failure> {
        let consumer = self.args.consumer()?;
        let client = match &self.args.api_base_url {
            Some(base_url) => Client::with_base_url(consumer, base_url.as_str())?,
            None => Client::new(consumer)?,
        };

        let query = MeasureQuery::last_days(
            access.user_id(),
            MeasureType::Weight,
            self.args.days,
            Utc::now(),
        );

        Ok(client.get_measurements(access, query).await?)
    }
}

fn present_authorization_url(url: &Url, open_browser: bool) {
    println!("Click the following link to authorize the application");
    println!("{}", url);

    if open_browser {
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!(error = %e, "Failed to open browser automatically");
        }
    }
}
