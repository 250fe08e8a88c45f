//! Upstream forwarding.
//!
//! # Responsibilities
//! - Build the outbound request (rewritten path, upstream authority, Host)
//! - Send it through a pooled HTTP client with bounded connect/response time
//! - Stream the upstream response back untouched
//!
//! # Design Decisions
//! - Method, headers and body pass through unchanged; only the URI and the
//!   `Host` header are rewritten
//! - The body is moved, never buffered
//! - No retries: the first failure is returned to the caller
//! - The upstream call lives inside the handler future, so a client
//!   disconnect drops it and abandons the upstream request

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::proxy::rewrite::rewrite_path_and_query;

/// Why a request could not be forwarded.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The configured origin is not a usable absolute URI.
    #[error("invalid upstream origin `{0}`")]
    InvalidOrigin(String),

    /// The rewritten request URI could not be assembled.
    #[error("invalid forwarded uri: {0}")]
    InvalidUri(#[from] axum::http::Error),

    /// Connect, DNS, reset or protocol failure talking to the upstream.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The upstream accepted the request but sent no response head in time.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Forwards API requests to a single upstream origin.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    host: HeaderValue,
    api_prefix: Arc<str>,
    response_timeout: Duration,
}

impl Forwarder {
    /// Create a forwarder for the configured upstream.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let invalid = || ProxyError::InvalidOrigin(config.origin.clone());

        let origin = Uri::from_str(&config.origin).map_err(|_| invalid())?;
        let scheme = origin.scheme().cloned().ok_or_else(invalid)?;
        let authority = origin.authority().cloned().ok_or_else(invalid)?;
        let host = HeaderValue::from_str(authority.as_str()).map_err(|_| invalid())?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(config.connect_timeout()));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme,
            authority,
            host,
            api_prefix: Arc::from(config.api_prefix.as_str()),
            response_timeout: config.response_timeout(),
        })
    }

    /// Upstream authority requests are sent to (e.g. `127.0.0.1:8000`).
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Turn an inbound request into the request sent upstream.
    ///
    /// The result owns its own URI and header map; nothing aliases the
    /// inbound request.
    pub fn prepare(&self, request: Request<Body>) -> Result<Request<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let uri = self.outbound_uri(&parts.uri)?;

        let mut outbound = Request::new(body);
        *outbound.method_mut() = parts.method;
        *outbound.uri_mut() = uri;
        *outbound.headers_mut() = parts.headers;
        outbound
            .headers_mut()
            .insert(header::HOST, self.host.clone());

        Ok(outbound)
    }

    /// Forward a request and return the upstream response as-is.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let outbound = self.prepare(request)?;

        let pending = self.client.request(outbound);
        let response: Response<Incoming> = tokio::time::timeout(self.response_timeout, pending)
            .await
            .map_err(|_| ProxyError::Timeout(self.response_timeout))??;

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    fn outbound_uri(&self, original: &Uri) -> Result<Uri, ProxyError> {
        let path_and_query = original
            .path_and_query()
            .map(PathAndQuery::as_str)
            .unwrap_or("/");

        let uri = Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(rewrite_path_and_query(path_and_query, &self.api_prefix))
            .build()?;
        Ok(uri)
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("scheme", &self.scheme)
            .field("authority", &self.authority)
            .field("api_prefix", &self.api_prefix)
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}
