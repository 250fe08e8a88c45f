//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single gateway handler
//! - Wire up middleware (request ID, tracing)
//! - Classify each request and dispatch to proxy or static stage
//! - Serve on a listener until the shutdown signal, then drain
//!
//! Every request runs on its own task; the state below is read-only, so a
//! slow upstream or a large file never holds up unrelated requests.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::assets::StaticSite;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response;
use crate::proxy::Forwarder;
use crate::routing::{Dispatch, Router as GatewayRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<GatewayRouter>,
    pub forwarder: Forwarder,
    pub site: Arc<StaticSite>,
}

impl AppState {
    /// Compile the immutable per-process state from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            router: Arc::new(GatewayRouter::from_config(&config.upstream)),
            forwarder: Forwarder::from_config(&config.upstream)?,
            site: Arc::new(StaticSite::from_config(&config.assets).map_err(GatewayError::Assets)?),
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is expected to be validated already.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run top to bottom on the way in: the request ID is assigned
    /// before the trace span opens, and copied to the response last.
    pub fn build_router(state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request.request_id(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
            .layer(propagate_request_id_layer());

        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests
    /// for at most the configured grace period.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), GatewayError> {
        let address = listener
            .local_addr()
            .map_err(|source| GatewayError::Bind {
                address: self.config.listener.bind_address.clone(),
                source,
            })?;
        let grace = Duration::from_secs(self.config.shutdown.grace_secs);

        tracing::info!(
            address = %address,
            upstream = %self.config.upstream.origin,
            api_prefix = %self.config.upstream.api_prefix,
            assets = %self.config.assets.root.display(),
            "HTTP server starting"
        );

        let (fired_tx, fired_rx) = oneshot::channel::<()>();
        let signal = async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            let _ = fired_tx.send(());
        };

        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .into_future();

        let deadline = async move {
            if fired_rx.await.is_ok() {
                tokio::time::sleep(grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = server => result.map_err(|source| GatewayError::Serve { address, source })?,
            () = deadline => {
                tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, closing remaining connections");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Classify, then either forward upstream or serve from disk.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request.request_id().to_owned();
    let path = request.uri().path().to_owned();

    match state.router.classify(&path) {
        Dispatch::Proxy => {
            let method = request.method().clone();
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                upstream = %state.forwarder.authority(),
                "Proxying request"
            );

            match state.forwarder.forward(request).await {
                Ok(upstream_response) => upstream_response,
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        error = %e,
                        "Proxy error"
                    );
                    response::proxy_error()
                }
            }
        }
        Dispatch::Static => state.site.serve(request, &request_id).await,
    }
}
