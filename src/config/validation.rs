//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, connection limits > 0)
//! - Check the resolver server override is an address we can query
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::{RelayConfig, ResolverKind};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTarget,
    ZeroRefreshInterval,
    ZeroLookupTimeout,
    ZeroMaxConnections,
    EmptyHost,
    InvalidServer(String),
    ServerWithStaticResolver,
    InvalidLogLevel(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTarget => write!(f, "target spec must not be empty"),
            ValidationError::ZeroRefreshInterval => {
                write!(f, "target.refresh_interval_secs must be greater than 0")
            }
            ValidationError::ZeroLookupTimeout => {
                write!(f, "target.lookup_timeout_secs must be greater than 0")
            }
            ValidationError::ZeroMaxConnections => {
                write!(f, "listener.max_connections must be greater than 0")
            }
            ValidationError::EmptyHost => write!(f, "listener.host must not be empty"),
            ValidationError::InvalidServer(s) => {
                write!(f, "resolver server '{}' is not an ip or ip:port", s)
            }
            ValidationError::ServerWithStaticResolver => {
                write!(f, "a resolver server cannot be combined with the static resolver")
            }
            ValidationError::InvalidLogLevel(l) => write!(f, "unknown log level '{}'", l),
        }
    }
}

impl std::error::Error for ValidationError {}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Parse a resolver server override: a bare IP uses port 53.
pub fn parse_server(server: &str) -> Option<SocketAddr> {
    let server = server.trim();
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Some(addr);
    }
    server
        .parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, 53))
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.target.spec.trim().is_empty() {
        errors.push(ValidationError::EmptyTarget);
    }
    if config.target.refresh_interval_secs == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }
    if config.target.lookup_timeout_secs == 0 {
        errors.push(ValidationError::ZeroLookupTimeout);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if let Some(server) = &config.target.server {
        if parse_server(server).is_none() {
            errors.push(ValidationError::InvalidServer(server.clone()));
        }
        if config.target.resolver == ResolverKind::Static {
            errors.push(ValidationError::ServerWithStaticResolver);
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
