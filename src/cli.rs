//! Command line interface.
//!
//! Every flag can also be supplied through an environment variable. Flags
//! override the config file, which overrides built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{read_config, ConfigError, GatewayConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "spa-gateway")]
#[command(about = "Serve a single-page app and proxy its API to a backend", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "SPA_GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8600.
    #[arg(long, env = "SPA_GATEWAY_BIND")]
    pub bind: Option<String>,

    /// Backend origin, e.g. http://127.0.0.1:8000.
    #[arg(long, env = "SPA_GATEWAY_UPSTREAM")]
    pub upstream: Option<String>,

    /// Path prefix forwarded to the backend (stripped before forwarding).
    #[arg(long, env = "SPA_GATEWAY_API_PREFIX")]
    pub api_prefix: Option<String>,

    /// Directory of pre-built static files.
    #[arg(long, env = "SPA_GATEWAY_ASSETS")]
    pub assets: Option<PathBuf>,

    /// Document served for unmatched paths (relative to the asset root).
    #[arg(long, env = "SPA_GATEWAY_FALLBACK")]
    pub fallback: Option<PathBuf>,

    /// Log level.
    #[arg(long, env = "SPA_GATEWAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, env = "SPA_GATEWAY_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Build the effective configuration: file (if any), then flag overrides.
    ///
    /// The result is not validated yet.
    pub fn resolve_config(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GatewayConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut GatewayConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address.clone_from(bind);
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.origin.clone_from(upstream);
        }
        if let Some(prefix) = &self.api_prefix {
            config.upstream.api_prefix.clone_from(prefix);
        }
        if let Some(assets) = &self.assets {
            config.assets.root.clone_from(assets);
        }
        if let Some(fallback) = &self.fallback {
            config.assets.fallback.clone_from(fallback);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}
