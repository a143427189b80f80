//! DNS SRV based discovery.
//!
//! # Responsibilities
//! - Build a resolver from the system configuration or a single override server
//! - Query SRV records for the target name
//! - Map records to `target:port` endpoints in a stable order
//!
//! # Design Decisions
//! - Records are ordered by priority, then weight (heaviest first), then name
//! - hickory's answer cache is disabled: every refresh asks the name server

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;

use crate::config::validation::parse_server;
use crate::discovery::resolver::{Resolve, ResolveError};
use crate::load_balancer::Endpoint;

/// The parts of an SRV record the relay cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvTarget {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

impl SrvTarget {
    fn endpoint(&self) -> Endpoint {
        let host = self.target.trim_end_matches('.');
        Endpoint::from(format!("{}:{}", host, self.port))
    }
}

/// Order SRV targets and turn them into endpoints.
pub fn endpoints_from_srv(mut records: Vec<SrvTarget>) -> Vec<Endpoint> {
    records.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(b.weight.cmp(&a.weight))
            .then_with(|| a.target.cmp(&b.target))
            .then(a.port.cmp(&b.port))
    });
    records.iter().map(SrvTarget::endpoint).collect()
}

/// Resolves SRV names through DNS.
#[derive(Clone)]
pub struct DnsResolver {
    resolver: TokioResolver,
    server: Option<SocketAddr>,
}

impl DnsResolver {
    /// Use the host's resolver configuration (`/etc/resolv.conf` on unix).
    pub fn from_system_conf(timeout: Duration) -> Result<Self, ResolveError> {
        let mut builder = TokioResolver::builder_tokio().map_err(ResolveError::ResolverInit)?;
        builder.options_mut().cache_size = 0;
        builder.options_mut().timeout = timeout;
        let resolver = builder.build();
        Ok(Self {
            resolver,
            server: None,
        })
    }

    /// Query only `server`, ignoring the system configuration.
    pub fn with_server(server: SocketAddr, timeout: Duration) -> Self {
        let name_servers = NameServerConfigGroup::from_ips_clear(&[server.ip()], server.port(), true);
        let config = ResolverConfig::from_parts(None, Vec::new(), name_servers);
        let mut builder =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default());
        builder.options_mut().cache_size = 0;
        builder.options_mut().timeout = timeout;
        let resolver = builder.build();
        Self {
            resolver,
            server: Some(server),
        }
    }

    /// Build from an optional `ip[:port]` override string.
    pub fn new(server: Option<&str>, timeout: Duration) -> Result<Self, ResolveError> {
        match server {
            Some(server) => parse_server(server)
                .map(|addr| Self::with_server(addr, timeout))
                .ok_or_else(|| ResolveError::InvalidServer(server.to_string())),
            None => Self::from_system_conf(timeout),
        }
    }

    pub fn server(&self) -> Option<SocketAddr> {
        self.server
    }
}

impl fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolver")
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve(&self, spec: &str) -> Result<Vec<Endpoint>, ResolveError> {
        let name = spec.trim();
        tracing::debug!(name = %name, server = ?self.server, "Looking up SRV records");

        let lookup = self
            .resolver
            .srv_lookup(name)
            .await
            .map_err(|source| ResolveError::Lookup {
                name: name.to_string(),
                source,
            })?;

        let records = lookup
            .iter()
            .map(|srv| SrvTarget {
                priority: srv.priority(),
                weight: srv.weight(),
                port: srv.port(),
                target: srv.target().to_utf8(),
            })
            .collect();

        let endpoints = endpoints_from_srv(records);
        tracing::debug!(name = %name, count = endpoints.len(), "SRV lookup returned endpoints");
        Ok(endpoints)
    }
}
