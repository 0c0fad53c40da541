mod models;

pub use models::{AuthorizationCallback, CallbackParams, RequestCredential};
