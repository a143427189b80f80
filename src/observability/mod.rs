//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (fields: addr, endpoint, spec, error, ...)
//!     → `connection` spans (id, peer) around each relay session
//!
//! Consumers:
//!     → logging.rs subscriber (stdout or file, text or JSON)
//! ```
//!
//! # Design Decisions
//! - Logging is the only observability surface
//! - Connection open/close events are trace level; failures are error level

#[cfg(test)]
pub(crate) mod capture;
pub mod logging;

pub use logging::{init_logging, LoggingError};
