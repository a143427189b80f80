//! The resolution seam between a target spec and the endpoint pool.

use async_trait::async_trait;
use thiserror::Error;

use crate::load_balancer::Endpoint;

/// Errors produced while building a resolver or resolving a spec.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The spec contained no usable entries.
    #[error("invalid target spec '{0}': no endpoints listed")]
    InvalidSpec(String),

    /// The name server could not answer (timeout, NXDOMAIN, no records, transport).
    #[error("lookup of '{name}' failed: {source}")]
    Lookup {
        name: String,
        #[source]
        source: hickory_resolver::ResolveError,
    },

    /// No usable system resolver configuration.
    #[error("failed to initialise DNS resolver: {0}")]
    ResolverInit(#[source] hickory_resolver::ResolveError),

    /// The resolver server override is not an `ip` or `ip:port`.
    #[error("invalid resolver server '{0}'")]
    InvalidServer(String),
}

/// Turns a target spec into an ordered list of endpoints.
///
/// Implementations do not cache; freshness is the refresh loop's job.
#[async_trait]
pub trait Resolve: Send + Sync + std::fmt::Debug {
    async fn resolve(&self, spec: &str) -> Result<Vec<Endpoint>, ResolveError>;
}
