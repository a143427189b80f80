//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from `ObservabilityConfig`
//! - Pick the sink: stdout, or a file opened in append mode
//! - Pick the format: human readable text or JSON lines
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - An unusable log file is not fatal; events go to stdout with a warning

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install log subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter directives for a plain level name.
///
/// The DNS client is capped at `warn` unless the relay itself is quieter.
pub fn default_filter(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" => {
            format!("{},hickory_proto=warn,hickory_resolver=warn", level)
        }
        _ => level,
    }
}

/// Open `path` for appending, creating it if needed.
pub fn open_output(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.log_level)))?;

    let mut open_failure = None;
    let (writer, ansi) = match &config.log_output {
        Some(path) => match open_output(path) {
            Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
            Err(e) => {
                open_failure = Some((path.clone(), e));
                (BoxMakeWriter::new(io::stdout), true)
            }
        },
        None => (BoxMakeWriter::new(io::stdout), true),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()?,
        LogFormat::Text => registry
            .with(fmt::layer().with_ansi(ansi).with_writer(writer))
            .try_init()?,
    }

    if let Some((path, e)) = open_failure {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Unable to open log file, defaulting to stdout"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn filter_quiets_dns_client_for_verbose_levels() {
        assert_eq!(
            default_filter("TRACE"),
            "trace,hickory_proto=warn,hickory_resolver=warn"
        );
        assert_eq!(default_filter("error"), "error");
        assert!(EnvFilter::try_new(default_filter("debug")).is_ok());
    }

    #[test]
    fn output_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");

        open_output(&path).unwrap().write_all(b"one\n").unwrap();
        open_output(&path).unwrap().write_all(b"two\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert!(open_output(&dir.path().join("missing/relay.log")).is_err());
    }
}
