//! Static hit or SPA fallback.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use tokio::fs;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::assets::resolver::{Asset, AssetResolver, MissReason, Resolution};
use crate::config::AssetsConfig;
use crate::http::response;

/// Serves the pre-built bundle with a single-document fallback.
#[derive(Debug, Clone)]
pub struct StaticSite {
    resolver: AssetResolver,
    fallback: PathBuf,
}

impl StaticSite {
    pub fn from_config(config: &AssetsConfig) -> io::Result<Self> {
        Ok(Self {
            resolver: AssetResolver::from_config(config)?,
            fallback: config.fallback_path(),
        })
    }

    /// Answer a non-API request. Hits may be 200, 206 or 304; everything
    /// else is the fallback with 200, unless the fallback itself is gone.
    pub async fn serve(&self, request: Request<Body>, request_id: &str) -> Response {
        // Only GET and HEAD look at the asset tree; any other method gets the shell.
        if request.method() != Method::GET && request.method() != Method::HEAD {
            return self.serve_fallback(request_id).await;
        }

        let path = request.uri().path().to_owned();
        match self.resolver.resolve(&path).await {
            Resolution::Hit(asset) => self.serve_asset(asset, request, request_id).await,
            Resolution::Miss(MissReason::Traversal) => {
                tracing::warn!(request_id = %request_id, path = %path, "Path traversal attempt blocked");
                self.serve_fallback(request_id).await
            }
            Resolution::Miss(reason) => {
                tracing::debug!(request_id = %request_id, path = %path, reason = ?reason, "Static miss");
                self.serve_fallback(request_id).await
            }
        }
    }

    /// Stream a confined file; conditional and range headers are honoured.
    async fn serve_asset(&self, asset: Asset, request: Request<Body>, request_id: &str) -> Response {
        let service = ServeFile::new_with_mime(&asset.path, &response::mime_for(&asset.path));
        let served = service
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        // The file vanished between resolving and opening it.
        if served.status() == StatusCode::NOT_FOUND {
            tracing::warn!(
                request_id = %request_id,
                file = %asset.path.display(),
                "Asset disappeared, serving fallback"
            );
            return self.serve_fallback(request_id).await;
        }

        tracing::debug!(
            request_id = %request_id,
            file = %asset.path.display(),
            bytes = asset.metadata.len(),
            status = served.status().as_u16(),
            "Static hit"
        );
        response::cacheable(served.map(Body::new))
    }

    async fn serve_fallback(&self, request_id: &str) -> Response {
        match read_with_mtime(&self.fallback).await {
            Ok((contents, modified)) => response::fallback_document(contents, modified),
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    file = %self.fallback.display(),
                    error = %e,
                    "Fallback document unreadable"
                );
                response::fallback_unavailable()
            }
        }
    }
}

async fn read_with_mtime(path: &Path) -> io::Result<(Bytes, Option<SystemTime>)> {
    let contents = fs::read(path).await?;
    let modified = fs::metadata(path).await.ok().and_then(|m| m.modified().ok());
    Ok((Bytes::from(contents), modified))
}
