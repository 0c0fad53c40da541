//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! The signature itself is computed by `oauth1-request`; this module only decides
//! which credentials and parameters go into it.

use crate::credentials::ConsumerCredentials;
use oauth1_request::serializer::{Serializer, SerializerExt};
use oauth1_request::signature_method::HmacSha1;
use oauth1_request::{Builder, Credentials};
use std::fmt::Display;

/// Request parameters kept in lexicographic order, as the signature base
/// string requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(&'static str, String)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter at its sorted position. Names must be unique.
    pub fn push(&mut self, name: &'static str, value: impl Display) {
        let position = self.0.partition_point(|(existing, _)| *existing < name);
        self.0.insert(position, (name, value.to_string()));
    }

    pub fn with(mut self, name: &'static str, value: impl Display) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl oauth1_request::Request for Parameters {
    fn serialize<S>(&self, mut serializer: S) -> S::Output
    where
        S: Serializer,
    {
        // `oauth_*` protocol parameters sort between our own names.
        let mut oauth_written = false;
        for (name, value) in &self.0 {
            if !oauth_written && *name > "oauth_" {
                serializer.serialize_oauth_parameters();
                oauth_written = true;
            }
            serializer.serialize_parameter(name, value);
        }
        if !oauth_written {
            serializer.serialize_oauth_parameters();
        }
        serializer.end()
    }
}

/// Builds `Authorization` header values for one request.
pub struct Signer<'a> {
    consumer: &'a ConsumerCredentials,
    token: Option<(&'a str, &'a str)>,
    callback: Option<&'a str>,
    verifier: Option<&'a str>,
}

impl<'a> Signer<'a> {
    pub fn new(consumer: &'a ConsumerCredentials) -> Self {
        Self {
            consumer,
            token: None,
            callback: None,
            verifier: None,
        }
    }

    pub fn token(mut self, token: &'a str, secret: &'a str) -> Self {
        self.token = Some((token, secret));
        self
    }

    pub fn callback(mut self, callback: &'a str) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn verifier(mut self, verifier: &'a str) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Header for a GET whose query string is `parameters`. `uri` must not
    /// carry a query string of its own.
    pub fn get(&self, uri: &str, parameters: &Parameters) -> String {
        self.builder().get(uri, parameters)
    }

    /// Header for a POST with an empty body.
    pub fn post(&self, uri: &str) -> String {
        self.builder().post(uri, &Parameters::new())
    }

    fn builder(&self) -> Builder<'a, HmacSha1, &'a str> {
        let client = Credentials::new(self.consumer.key(), self.consumer.secret());
        let mut builder: Builder<'a, HmacSha1, &'a str> = Builder::new(client, HmacSha1::new());
        if let Some((token, secret)) = self.token {
            builder.token(Credentials::new(token, secret));
        }
        builder.callback(self.callback);
        builder.verifier(self.verifier);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumer() -> ConsumerCredentials {
        ConsumerCredentials::new("consumer-key", "consumer-secret")
    }

    #[test]
    fn parameters_stay_sorted() {
        let parameters = Parameters::new()
            .with("userid", 13644360)
            .with("action", "getmeas")
            .with("meastype", 1)
            .with("offset", 0);

        let names: Vec<_> = parameters.as_slice().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["action", "meastype", "offset", "userid"]);
        assert_eq!(parameters.get("userid"), Some("13644360"));
        assert_eq!(parameters.get("limit"), None);
    }

    #[test]
    fn get_header_carries_consumer_and_token() {
        let consumer = consumer();
        let parameters = Parameters::new().with("action", "getmeas");
        let header = Signer::new(&consumer)
            .token("access-token", "access-secret")
            .get("https://api.health.nokia.com/measure", &parameters);

        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_consumer_key="consumer-key""#));
        assert!(header.contains(r#"oauth_token="access-token""#));
        assert!(header.contains(r#"oauth_signature_method="HMAC-SHA1""#));
        assert!(header.contains("oauth_signature="));
        assert!(header.contains("oauth_nonce="));
        // Query parameters are signed but travel in the URL, not the header.
        assert!(!header.contains("getmeas"));
        // Secrets never appear in clear.
        assert!(!header.contains("access-secret"));
        assert!(!header.contains("consumer-secret"));
    }

    #[test]
    fn post_header_carries_callback_and_verifier() {
        let consumer = consumer();
        let header = Signer::new(&consumer)
            .callback("http://localhost:9002")
            .post("https://developer.health.nokia.com/account/request_token");
        assert!(header.contains("oauth_callback="));
        assert!(!header.contains("oauth_token="));

        let header = Signer::new(&consumer)
            .token("request-token", "request-secret")
            .verifier("the-verifier")
            .post("https://developer.health.nokia.com/account/access_token");
        assert!(header.contains(r#"oauth_verifier="the-verifier""#));
        assert!(header.contains(r#"oauth_token="request-token""#));
    }

    #[test]
    fn nonces_differ_between_requests() {
        let consumer = consumer();
        let signer = Signer::new(&consumer).token("t", "s");
        let first = signer.get("https://example.com/measure", &Parameters::new());
        let second = signer.get("https://example.com/measure", &Parameters::new());
        assert_ne!(first, second);
    }
}
