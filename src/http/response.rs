//! Response construction.
//!
//! # Responsibilities
//! - Build the fallback response and the cache headers on static files
//! - Infer media types for files on disk
//! - Map proxy failures to the fixed 500 response
//!
//! # Design Decisions
//! - Upstream responses are never rebuilt here; they stream through as-is
//! - Text types advertise a UTF-8 charset

use std::path::Path;
use std::time::SystemTime;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use mime_guess::mime::{self, Mime};

/// Body sent when the upstream cannot be reached.
pub const PROXY_ERROR_BODY: &str = "Proxy Error";

const CACHE_CONTROL: &str = "public, max-age=0";
const HTML_UTF8: &str = "text/html; charset=utf-8";

/// The one response a failed upstream call produces.
pub fn proxy_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        PROXY_ERROR_BODY,
    )
        .into_response()
}

/// Answer when even the fallback document cannot be read.
pub fn fallback_unavailable() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Fallback document unavailable",
    )
        .into_response()
}

/// 200 response carrying the fallback document, always served as HTML.
pub fn fallback_document(contents: Bytes, modified: Option<SystemTime>) -> Response {
    let mut response = Response::new(Body::from(contents));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_UTF8));
    if let Some(modified) = modified {
        if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
    cacheable(response)
}

/// Mark a static response as revalidate-on-every-use.
pub fn cacheable(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    response
}

/// Media type inferred from the file extension.
pub fn mime_for(path: &Path) -> Mime {
    let guess = mime_guess::from_path(path).first_or_octet_stream();
    let textual = guess.type_() == mime::TEXT
        || guess.subtype() == mime::JAVASCRIPT
        || guess.subtype() == mime::JSON;

    if textual && guess.get_param(mime::CHARSET).is_none() {
        format!("{guess}; charset=utf-8").parse().unwrap_or(guess)
    } else {
        guess
    }
}
