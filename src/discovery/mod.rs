//! Backend discovery subsystem.
//!
//! # Data Flow
//! ```text
//! TargetConfig
//!     → build_resolver() picks a strategy:
//!         - static_list.rs (comma separated host:port list)
//!         - dns.rs (SRV lookup, optional override server)
//!     → startup resolves once (fatal on failure)
//!     → refresh.rs re-resolves on an interval
//!     → load_balancer::RoundRobin::replace()
//! ```
//!
//! # Design Decisions
//! - Resolvers are stateless queries; only the pool holds results
//! - A failed refresh never clears the pool

pub mod dns;
pub mod refresh;
pub mod resolver;
pub mod static_list;

use std::sync::Arc;

use crate::config::{ResolverKind, TargetConfig};

pub use dns::DnsResolver;
pub use refresh::Refresher;
pub use resolver::{Resolve, ResolveError};
pub use static_list::StaticResolver;

/// True when `spec` reads as a literal endpoint list rather than a name.
///
/// Lists contain a comma, or every entry ends in a numeric `:port`.
pub fn is_endpoint_list(spec: &str) -> bool {
    let spec = spec.trim();
    if spec.contains(',') {
        return true;
    }
    match spec.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

/// Pick and construct the resolver for a target configuration.
pub fn build_resolver(config: &TargetConfig) -> Result<Arc<dyn Resolve>, ResolveError> {
    let use_static = match config.resolver {
        ResolverKind::Static => true,
        ResolverKind::Dns => false,
        ResolverKind::Auto => is_endpoint_list(&config.spec),
    };

    if use_static {
        if let Some(server) = &config.server {
            tracing::warn!(server = %server, "Ignoring resolver server for a static target list");
        }
        tracing::info!(spec = %config.spec, "Using static target list");
        return Ok(Arc::new(StaticResolver::new()));
    }

    let resolver = DnsResolver::new(config.server.as_deref(), config.lookup_timeout())?;
    tracing::info!(
        spec = %config.spec,
        server = ?resolver.server(),
        "Using DNS SRV discovery"
    );
    Ok(Arc::new(resolver))
}
