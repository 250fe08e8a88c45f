//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one task per connection)
//!     → request.rs (assign/propagate x-request-id)
//!     → routing layer classifies by path prefix
//!     → proxy forwarder or static site
//!     → response.rs (file responses, fixed proxy error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
