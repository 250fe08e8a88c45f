//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI / environment overrides (main.rs)
//!     → validation.rs (semantic checks, filesystem checks)
//!     → GatewayConfig (validated, immutable)
//!     → compiled into router, proxy and asset resolver at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, ConfigError};
pub use schema::{
    AssetsConfig, GatewayConfig, ListenerConfig, LogFormat, LoggingConfig, ShutdownConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
