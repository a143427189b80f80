//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build resolver → Resolve targets → Bind listener
//!     → Spawn refresh loop → Run accept loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop refresh loop → Stop accepting → Abort sessions
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: resolver first, then targets, then listener
//! - Sessions are not drained; shutdown is abrupt for in-flight relays

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{RelayServer, StartupError};
