mod handler;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::common::CallbackParams;
use crate::error::AuthError;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Clone)]
struct CallbackState {
    sender: Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>,
}

/// Local HTTP receiver for one authorization redirect.
///
/// Each handshake binds its own listener and router. The server task stops on
/// [`CallbackListener::shutdown`] or, failing that, when the listener is dropped.
pub struct CallbackListener {
    host: String,
    local_addr: SocketAddr,
    receiver: Option<oneshot::Receiver<CallbackParams>>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl CallbackListener {
    pub async fn bind(host: &str, port: u16) -> Result<Self, AuthError> {
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(AuthError::Listener)?;
        let local_addr = listener.local_addr().map_err(AuthError::Listener)?;

        let (callback_tx, callback_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = CallbackState {
            sender: Arc::new(Mutex::new(Some(callback_tx))),
        };
        let app = Router::new()
            .route("/", get(handler::authorization_callback))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "Callback listener stopped with error");
            }
        });

        tracing::info!(%local_addr, "Listening for authorization callback");

        Ok(Self {
            host: host.to_string(),
            local_addr,
            receiver: Some(callback_rx),
            shutdown: Some(shutdown_tx),
            server: Some(server),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL the service should redirect the user to.
    pub fn callback_url(&self) -> String {
        let port = self.local_addr.port();
        if self.host.contains(':') {
            format!("http://[{}]:{}", self.host, port)
        } else {
            format!("http://{}:{}", self.host, port)
        }
    }

    /// Wait for the first redirect, or fail once `timeout` elapses.
    pub async fn wait(&mut self, timeout: Duration) -> Result<CallbackParams, AuthError> {
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| AuthError::Protocol("callback already consumed".to_string()))?;

        tokio::select! {
            received = receiver => received.map_err(|_| {
                AuthError::Protocol("callback listener stopped unexpectedly".to_string())
            }),
            _ = tokio::time::sleep(timeout) => Err(AuthError::Timeout(timeout)),
        }
    }

    /// Stop accepting connections and release the port.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(mut server) = self.server.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await.is_err() {
                tracing::warn!("Callback listener did not stop in time, aborting");
                server.abort();
                let _ = server.await;
            }
        }
        tracing::debug!(local_addr = %self.local_addr, "Callback listener closed");
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}
