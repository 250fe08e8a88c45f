//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream origin is a usable absolute URL
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check the asset root and fallback document exist on disk
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before any socket is bound

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{value}` is not a socket address")]
    BindAddress { value: String },

    #[error("upstream.origin `{value}`: {reason}")]
    Origin { value: String, reason: String },

    #[error("upstream.api_prefix `{value}`: {reason}")]
    ApiPrefix { value: String, reason: &'static str },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("assets.root `{}` is not a directory", .0.display())]
    AssetRoot(PathBuf),

    #[error("fallback document `{}` is not a regular file", .0.display())]
    Fallback(PathBuf),

    #[error("assets.index_file `{0}` must be a bare file name")]
    IndexFile(String),

    #[error("logging.level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress {
            value: config.listener.bind_address.clone(),
        });
    }

    if let Err(reason) = check_origin(&config.upstream.origin) {
        errors.push(ValidationError::Origin {
            value: config.upstream.origin.clone(),
            reason,
        });
    }

    if let Err(reason) = check_api_prefix(&config.upstream.api_prefix) {
        errors.push(ValidationError::ApiPrefix {
            value: config.upstream.api_prefix.clone(),
            reason,
        });
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.connect_timeout_secs"));
    }
    if config.upstream.response_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.response_timeout_secs"));
    }

    let index = &config.assets.index_file;
    if index.is_empty() || index.contains(['/', '\\']) || index == "." || index == ".." {
        errors.push(ValidationError::IndexFile(index.clone()));
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(config.logging.level.clone()));
    }

    if !config.assets.root.is_dir() {
        errors.push(ValidationError::AssetRoot(config.assets.root.clone()));
    }

    let fallback = config.assets.fallback_path();
    if !fallback.is_file() {
        errors.push(ValidationError::Fallback(fallback));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The upstream must be a bare `http` origin: scheme, host and port only.
fn check_origin(origin: &str) -> Result<(), String> {
    let url = Url::parse(origin).map_err(|e| e.to_string())?;

    if url.scheme() != "http" {
        return Err(format!("scheme `{}` is not supported, use http", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.port_or_known_default().is_none() {
        return Err("missing port".to_string());
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err("credentials are not allowed".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a path, query or fragment".to_string());
    }
    Ok(())
}

fn check_api_prefix(prefix: &str) -> Result<(), &'static str> {
    if prefix.is_empty() {
        return Err("must not be empty");
    }
    if !prefix.starts_with('/') {
        return Err("must start with `/`");
    }
    if prefix.len() == 1 || prefix.ends_with('/') {
        return Err("must name a segment and not end with `/`");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_with_assets(dir: &tempfile::TempDir) -> GatewayConfig {
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let mut config = GatewayConfig::default();
        config.assets.root = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_default_config_with_assets_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_assets(&dir);
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.assets.root = PathBuf::from("/definitely/not/here");
        config.upstream.origin = "ftp://backend".into();
        config.upstream.api_prefix = "api".into();
        config.upstream.response_timeout_secs = 0;
        config.listener.bind_address = "nowhere".into();
        config.logging.level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::BindAddress { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Origin { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ApiPrefix { .. })));
        assert!(errors.contains(&ValidationError::ZeroTimeout("upstream.response_timeout_secs")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::AssetRoot(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Fallback(_))));
        assert!(errors.contains(&ValidationError::LogLevel("loud".into())));
    }

    #[test]
    fn test_missing_fallback_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GatewayConfig::default();
        config.assets.root = dir.path().to_path_buf();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::Fallback(dir.path().join("index.html"))]);
    }

    #[test]
    fn test_origin_rules() {
        assert!(check_origin("http://127.0.0.1:8000").is_ok());
        assert!(check_origin("http://backend").is_ok());
        assert!(check_origin("http://backend:8000/").is_ok());
        assert!(check_origin("https://backend:8443").is_err());
        assert!(check_origin("http://backend:8000/v1").is_err());
        assert!(check_origin("http://backend:8000?x=1").is_err());
        assert!(check_origin("127.0.0.1:8000").is_err());
    }

    #[test]
    fn test_api_prefix_rules() {
        assert!(check_api_prefix("/api").is_ok());
        assert!(check_api_prefix("/api/v2").is_ok());
        assert!(check_api_prefix("").is_err());
        assert!(check_api_prefix("/").is_err());
        assert!(check_api_prefix("/api/").is_err());
        assert!(check_api_prefix("api").is_err());
    }
}
