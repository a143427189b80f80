//! DNS-aware TCP relay library.
//!
//! Accepts TCP connections and relays each one, byte for byte, to the next
//! endpoint of a round-robin pool. The pool is filled from a static list or
//! from DNS SRV records and re-resolved on an interval.

pub mod config;
pub mod discovery;
pub mod lifecycle;
pub mod load_balancer;
pub mod net;
pub mod observability;

pub use config::schema::RelayConfig;
pub use lifecycle::{RelayServer, Shutdown};
