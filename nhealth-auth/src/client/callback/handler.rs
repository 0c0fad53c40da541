use axum::{
    extract::{Query, State},
    response::Html,
};

use super::CallbackState;
use crate::common::CallbackParams;

const AUTHORIZATION_COMPLETE_HTML: &str = r#"<html><head></head><body onload="window.close();"><h2>Authorization Complete</h2></body></html>"#;

/// Forwards the first redirect to the waiting handshake; later ones only get the page.
pub(super) async fn authorization_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    let sender = state.sender.lock().ok().and_then(|mut sender| sender.take());

    match sender {
        Some(sender) => {
            tracing::info!("Authorization callback received");
            if sender.send(params).is_err() {
                tracing::warn!("Authorization callback arrived after the handshake ended");
            }
        }
        None => tracing::debug!("Ignoring repeated authorization callback"),
    }

    Html(AUTHORIZATION_COMPLETE_HTML)
}
