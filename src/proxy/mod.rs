//! Upstream proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Request classified as Dispatch::Proxy
//!     → rewrite.rs (strip API prefix, keep query)
//!     → forwarder.rs (upstream authority + Host, pooled client, timeouts)
//!     → upstream response streamed back
//!     → on ProxyError: fixed 500 "Proxy Error" (http::response)
//! ```

pub mod forwarder;
pub mod rewrite;

pub use forwarder::{Forwarder, ProxyError};
pub use rewrite::rewrite_path_and_query;
