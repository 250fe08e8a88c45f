//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → tracing events with request_id fields
//!     → tower-http TraceLayer spans per request
//!
//! logging.rs installs the subscriber (pretty or JSON to stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
