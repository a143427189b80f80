//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (id, lifetime tracking)
//!     → relay.rs (select endpoint, dial, copy both ways)
//!
//! Session lifecycle:
//!     Accepted → Dialing → Relaying → Closed
//!              ↘ (empty pool / dial error) → Closed
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Each session is its own task; a failure or panic stays inside it
//! - The relay is byte-transparent: no framing, no inspection

pub mod connection;
pub mod listener;
pub mod relay;

pub use listener::{Listener, ListenerError};
pub use relay::{Relay, SessionOutcome};
