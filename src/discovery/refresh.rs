//! Periodic re-resolution of the target spec.
//!
//! # Responsibilities
//! - Sleep for the refresh interval, resolve, publish the new set
//! - Keep the previous set when a resolution fails
//! - Stop when the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::discovery::resolver::Resolve;
use crate::load_balancer::{Endpoint, LoadBalancer, RoundRobin};

pub struct Refresher {
    resolver: Arc<dyn Resolve>,
    spec: String,
    pool: Arc<RoundRobin>,
    interval: Duration,
}

impl Refresher {
    pub fn new(
        resolver: Arc<dyn Resolve>,
        spec: impl Into<String>,
        pool: Arc<RoundRobin>,
        interval: Duration,
    ) -> Self {
        Self {
            resolver,
            spec: spec.into(),
            pool,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            spec = %self.spec,
            "Target refresh starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; startup has just resolved.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Target refresh received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Resolve once and publish the result. Returns whether the pool was updated.
    pub async fn refresh_once(&self) -> bool {
        match self.resolver.resolve(&self.spec).await {
            Ok(targets) => {
                self.apply(targets);
                true
            }
            Err(e) => {
                tracing::error!(
                    spec = %self.spec,
                    error = %e,
                    "Error refreshing targets, keeping current set"
                );
                false
            }
        }
    }

    fn apply(&self, targets: Vec<Endpoint>) {
        let previous = self.pool.snapshot();
        if previous[..] != targets[..] {
            tracing::info!(
                count = targets.len(),
                previous = previous.len(),
                targets = ?targets,
                "Target set changed"
            );
        } else {
            tracing::debug!(count = targets.len(), "Target set unchanged");
        }
        self.pool.replace(targets);
    }
}
