//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the resolver selected by the target configuration
//! - Resolve the target once before accepting traffic
//! - Bind the listener
//! - Run the refresh loop and the accept loop until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use crate::config::RelayConfig;
use crate::discovery::{self, ResolveError, Refresher};
use crate::lifecycle::Shutdown;
use crate::load_balancer::RoundRobin;
use crate::net::{Listener, ListenerError, Relay};

/// Fatal startup failures. Each one maps to a non-zero exit code.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("error creating resolver: {0}")]
    Resolver(#[source] ResolveError),

    #[error("error reading targets: {0}")]
    InitialResolution(#[source] ResolveError),

    #[error("error starting listener: {0}")]
    Listener(#[source] ListenerError),
}

/// A relay that has resolved its targets and bound its port.
pub struct RelayServer {
    listener: Listener,
    refresher: Refresher,
    pool: Arc<RoundRobin>,
}

impl RelayServer {
    /// Run every startup step, in order.
    pub async fn bind(config: &RelayConfig) -> Result<Self, StartupError> {
        let resolver = discovery::build_resolver(&config.target).map_err(StartupError::Resolver)?;

        let targets = resolver
            .resolve(&config.target.spec)
            .await
            .map_err(StartupError::InitialResolution)?;

        tracing::info!(count = targets.len(), targets = ?targets, "Initial targets resolved");

        let pool = Arc::new(RoundRobin::new(targets));
        let refresher = Refresher::new(
            resolver,
            config.target.spec.clone(),
            pool.clone(),
            config.target.refresh_interval(),
        );

        let listener = Listener::bind(&config.listener)
            .await
            .map_err(StartupError::Listener)?;

        Ok(Self {
            listener,
            refresher,
            pool,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// The live endpoint pool.
    pub fn pool(&self) -> Arc<RoundRobin> {
        self.pool.clone()
    }

    /// Serve until `shutdown` fires.
    ///
    /// Both loops subscribe before this returns, so a trigger issued while the
    /// future is still unpolled is not lost.
    pub fn run(self, shutdown: &Shutdown) -> impl Future<Output = Result<(), StartupError>> {
        let refresh_shutdown = shutdown.subscribe();
        let accept_shutdown = shutdown.subscribe();
        let shutdown = shutdown.clone();

        async move {
            let refresh = tokio::spawn(self.refresher.run(refresh_shutdown));
            let relay = Relay::new(self.pool.clone());

            if let Ok(address) = self.listener.local_addr() {
                tracing::info!(address = %address, "Listening for connections");
            }

            let served = self
                .listener
                .run(relay, accept_shutdown)
                .await
                .map_err(StartupError::Listener);

            // The accept loop only returns early on error; make sure refresh stops too.
            shutdown.trigger();
            if let Err(e) = refresh.await {
                tracing::error!(error = %e, "Target refresh task failed");
            }

            served
        }
    }
}

/// Start the relay described by `config` and serve until `shutdown` fires.
pub async fn run(config: &RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    RelayServer::bind(config).await?.run(shutdown).await
}
