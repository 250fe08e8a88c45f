//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (classify)
//!     → matcher.rs (evaluate API prefix)
//!     → Return: Dispatch::Proxy or Dispatch::Static
//! ```
//!
//! # Design Decisions
//! - Compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same dispatch

pub mod matcher;
pub mod router;

pub use router::{Dispatch, Router};
