//! DNS-aware TCP relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                   DNS RELAY                   │
//!                       │                                               │
//!   Client connection   │  ┌──────────┐    ┌──────────┐   ┌──────────┐  │
//!   ────────────────────┼─▶│   net    │───▶│   net    │──▶│   dial   │──┼──▶ Backend
//!                       │  │ listener │    │  relay   │   │ endpoint │  │
//!                       │  └──────────┘    └────┬─────┘   └──────────┘  │
//!                       │                       │ next()                │
//!                       │                       ▼                       │
//!                       │               ┌───────────────┐               │
//!                       │               │ load_balancer │               │
//!                       │               │  round robin  │               │
//!                       │               └───────▲───────┘               │
//!                       │                       │ replace()             │
//!                       │               ┌───────┴───────┐               │
//!                       │               │   discovery   │◀──────────────┼──── DNS (SRV)
//!                       │               │ refresh loop  │               │
//!                       │               └───────────────┘               │
//!                       │                                               │
//!                       │  config · observability · lifecycle           │
//!                       └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dns_relay::config::loader::{read_config, ConfigError};
use dns_relay::config::validation::validate_config;
use dns_relay::config::{LogFormat, RelayConfig, ResolverKind};
use dns_relay::lifecycle::{signals, startup, Shutdown};
use dns_relay::observability::init_logging;

#[derive(Debug, Parser)]
#[command(name = "dns-relay")]
#[command(about = "TCP relay that round-robins connections over DNS-discovered backends", long_about = None)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind the server to
    #[arg(long)]
    host: Option<String>,

    /// The target service: "host:port,host:port" or an SRV name
    #[arg(short, long)]
    target: Option<String>,

    /// The DNS server to query instead of the system resolvers (ip or ip:port)
    #[arg(short, long)]
    server: Option<String>,

    /// How the target is resolved
    #[arg(long, value_enum)]
    resolver: Option<ResolverArg>,

    /// Format for log output
    #[arg(long, value_enum)]
    logger_format: Option<FormatArg>,

    /// Log output level: ERROR | WARN | INFO | DEBUG | TRACE
    #[arg(long)]
    logger_level: Option<String>,

    /// File to append log output to; stdout when omitted
    #[arg(long)]
    logger_output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ResolverArg {
    Auto,
    Static,
    Dns,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl Cli {
    /// Load the config file (if any) and layer the flags on top.
    fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(target) = self.target {
            config.target.spec = target;
        }
        if let Some(server) = self.server {
            config.target.server = Some(server);
        }
        if let Some(resolver) = self.resolver {
            config.target.resolver = match resolver {
                ResolverArg::Auto => ResolverKind::Auto,
                ResolverArg::Static => ResolverKind::Static,
                ResolverArg::Dns => ResolverKind::Dns,
            };
        }
        if let Some(format) = self.logger_format {
            config.observability.log_format = match format {
                FormatArg::Text => LogFormat::Text,
                FormatArg::Json => LogFormat::Json,
            };
        }
        if let Some(level) = self.logger_level {
            config.observability.log_level = level;
        }
        if let Some(output) = self.logger_output {
            config.observability.log_output = Some(output);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dns-relay: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("dns-relay: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        target = %config.target.spec,
        refresh_interval_secs = config.target.refresh_interval_secs,
        "dns-relay starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    match startup::run(&config, &shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}
