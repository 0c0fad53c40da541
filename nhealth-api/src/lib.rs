pub mod credentials;
pub mod endpoints;
mod error;
mod macros;
pub mod signing;

pub use crate::credentials::{AccessCredentials, ConsumerCredentials};
pub use crate::endpoints::measure::{
    Category, Measure, MeasureGroup, MeasureQuery, MeasureResponse, MeasureType,
};
pub use crate::error::HealthApiError;

use endpoints::Request;
use reqwest::header::AUTHORIZATION;
use signing::Signer;
use std::time::Duration;

const BASE_URL: &str = "https://api.health.nokia.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Signed client for the measurement API.
///
/// Each call signs its own request with the consumer credentials and the
/// caller's access credentials, so one client can serve several users at once.
pub struct Client {
    inner: reqwest::Client,
    base_url: String,
    consumer: ConsumerCredentials,
}

impl Client {
    pub fn new(consumer: ConsumerCredentials) -> Result<Self, HealthApiError> {
        Self::with_base_url(consumer, BASE_URL)
    }

    pub fn with_base_url(
        consumer: ConsumerCredentials,
        base_url: impl Into<String>,
    ) -> Result<Self, HealthApiError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            inner,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            consumer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch body measurements for the user owning `credentials`.
    ///
    /// A non-zero `status` reported by the service is part of the returned
    /// response; only transport and decode failures are errors here.
    pub async fn get_measurements(
        &self,
        credentials: &AccessCredentials,
        query: MeasureQuery,
    ) -> Result<MeasureResponse, HealthApiError> {
        self.send(credentials, query).await
    }

    pub(crate) async fn send<R>(
        &self,
        credentials: &AccessCredentials,
        request: R,
    ) -> Result<R::Response, HealthApiError>
    where
        R: Request,
    {
        let url = format!("{}{}", self.base_url, request.endpoint());
        let parameters = request.parameters();

        let authorization = Signer::new(&self.consumer)
            .token(credentials.token(), credentials.secret())
            .get(&url, &parameters);

        tracing::debug!(url = %url, user_id = credentials.user_id(), "Sending signed request");

        let body = self
            .inner
            .get(&url)
            .query(parameters.as_slice())
            .header(AUTHORIZATION, authorization)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        serde_json::from_str(&body).map_err(HealthApiError::Decode)
    }
}
