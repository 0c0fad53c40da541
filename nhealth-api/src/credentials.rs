use secrecy::{ExposeSecret, SecretString};

/// Application key and secret issued by the service's developer portal.
#[derive(Debug)]
pub struct ConsumerCredentials {
    key: String,
    secret: SecretString,
}

impl ConsumerCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

/// Long-lived credentials authorizing calls on behalf of one user.
#[derive(Debug)]
pub struct AccessCredentials {
    user_id: u64,
    token: String,
    secret: SecretString,
}

impl AccessCredentials {
    pub fn new(user_id: u64, token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}
