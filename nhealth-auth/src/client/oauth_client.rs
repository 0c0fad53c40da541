use nhealth_api::signing::Signer;
use nhealth_api::{AccessCredentials, ConsumerCredentials};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::config::Settings;
use crate::common::RequestCredential;
use crate::error::AuthError;

const HTTP_TIMEOUT_SECS: u64 = 10;

/// Token pair from a form-encoded token endpoint response
struct TokenResponse {
    token: String,
    secret: String,
    user_id: Option<String>,
}

/// Client for the three token endpoints of the delegated authorization flow.
pub struct OAuthClient {
    http_client: Client,
    consumer: ConsumerCredentials,
    request_token_url: Url,
    authorize_url: Url,
    access_token_url: Url,
}

impl OAuthClient {
    pub fn new(consumer: ConsumerCredentials, settings: &Settings) -> Result<Self, AuthError> {
        let request_token_url = parse_url("request token", &settings.request_token_url)?;
        let authorize_url = parse_url("authorize", &settings.authorize_url)?;
        let access_token_url = parse_url("access token", &settings.access_token_url)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            consumer,
            request_token_url,
            authorize_url,
            access_token_url,
        })
    }

    pub fn consumer(&self) -> &ConsumerCredentials {
        &self.consumer
    }

    /// Obtain a temporary request credential; the service will redirect the
    /// user to `callback_url` once they approve.
    pub async fn request_token(&self, callback_url: &str) -> Result<RequestCredential, AuthError> {
        let authorization = Signer::new(&self.consumer)
            .callback(callback_url)
            .post(self.request_token_url.as_str());

        let response = self
            .post_for_token(&self.request_token_url, authorization)
            .await?;

        tracing::debug!("Obtained request token");

        Ok(RequestCredential::new(response.token, response.secret))
    }

    /// Consent page the user must visit for `request`.
    pub fn authorization_url(&self, request: &RequestCredential) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("oauth_token", request.token());
        url
    }

    /// Exchange an approved request credential for access credentials.
    ///
    /// `user_id` comes from the authorization redirect; when absent, the
    /// `userid` field of the token response is used instead.
    pub async fn access_token(
        &self,
        request: &RequestCredential,
        verifier: &str,
        user_id: Option<&str>,
    ) -> Result<AccessCredentials, AuthError> {
        let authorization = Signer::new(&self.consumer)
            .token(request.token(), request.secret())
            .verifier(verifier)
            .post(self.access_token_url.as_str());

        let response = self
            .post_for_token(&self.access_token_url, authorization)
            .await?;

        let user_id = user_id
            .map(str::to_string)
            .or(response.user_id)
            .ok_or_else(|| AuthError::Protocol("no user id returned".to_string()))?;
        let user_id: u64 = user_id
            .parse()
            .map_err(|_| AuthError::Protocol(format!("invalid user id: {}", user_id)))?;

        tracing::debug!(user_id, "Exchanged verifier for access token");

        Ok(AccessCredentials::new(
            user_id,
            response.token,
            response.secret,
        ))
    }

    async fn post_for_token(
        &self,
        url: &Url,
        authorization: String,
    ) -> Result<TokenResponse, AuthError> {
        let body = self
            .http_client
            .post(url.clone())
            .header(AUTHORIZATION, authorization)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_token_response(&body)
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, AuthError> {
    Url::parse(value)
        .map_err(|e| AuthError::Configuration(format!("Invalid {} URL: {}", name, e)))
}

fn parse_token_response(body: &str) -> Result<TokenResponse, AuthError> {
    let mut fields: HashMap<String, String> = url::form_urlencoded::parse(body.trim().as_bytes())
        .into_owned()
        .collect();

    let mut take = |name: &str| {
        fields
            .remove(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AuthError::Protocol(format!("token response missing {}", name)))
    };

    let token = take("oauth_token")?;
    let secret = take("oauth_token_secret")?;
    let user_id = take("userid").ok();

    Ok(TokenResponse {
        token,
        secret,
        user_id,
    })
}
