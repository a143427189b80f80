//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! discovery::refresh (sole writer)
//!     → replace() swaps the whole endpoint set
//!
//! net::relay (many readers)
//!     → next() advances the cursor and picks set[cursor % len]
//!     → dial the endpoint
//! ```
//!
//! # Design Decisions
//! - Strict round-robin; no weights, no health state
//! - An empty set is a normal state, not an error
//! - Failures are only discovered when the caller dials

pub mod endpoint;
pub mod round_robin;

pub use endpoint::Endpoint;
pub use round_robin::RoundRobin;

/// Selection strategy over a replaceable endpoint set.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Next endpoint to dial, or `None` when the set is empty.
    fn next(&self) -> Option<Endpoint>;

    /// Swap in a new endpoint set. Always succeeds, empty sets included.
    fn replace(&self, targets: Vec<Endpoint>);
}
