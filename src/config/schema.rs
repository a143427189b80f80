//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, backpressure).
    pub listener: ListenerConfig,

    /// Backend target discovery.
    pub target: TargetConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to bind on (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind on. Port 0 asks the OS for an ephemeral port.
    pub port: u16,

    /// Maximum concurrent relay sessions (backpressure).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// The `host:port` string handed to the socket layer.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
            max_connections: 10_000,
        }
    }
}

/// Which resolution strategy turns the target spec into endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Literal endpoint lists are split, anything else goes to DNS.
    #[default]
    Auto,
    /// Always treat the spec as a comma separated endpoint list.
    Static,
    /// Always treat the spec as an SRV name.
    Dns,
}

/// Backend target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Either a literal list ("10.0.0.1:80,10.0.0.2:80") or an SRV name
    /// ("_db._tcp.service.consul").
    pub spec: String,

    /// Resolution strategy.
    pub resolver: ResolverKind,

    /// Name server to query instead of the system resolvers ("ip" or "ip:port").
    pub server: Option<String>,

    /// Seconds between re-resolution attempts.
    pub refresh_interval_secs: u64,

    /// Seconds to wait for a name server answer before a lookup fails.
    pub lookup_timeout_secs: u64,
}

impl TargetConfig {
    /// Refresh interval as a [`Duration`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            spec: String::new(),
            resolver: ResolverKind::Auto,
            server: None,
            refresh_interval_secs: 5,
            lookup_timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format for log events.
    pub log_format: LogFormat,

    /// File to append log events to. Stdout when absent.
    pub log_output: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_output: None,
        }
    }
}
