//! Logging initialization for the loghint CLI.
//!
//! Logs always go to stderr so that stdout carries only rendered output.
//! `--output json` switches the log lines to JSON as well.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Default log level when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `--log-level` wins over `RUST_LOG` when both are present.
pub fn init_tracing(log_level: Option<&str>, format: OutputFormat) -> Result<(), CliError> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| CliError::Config(format!("invalid log level '{level}': {e}")))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        OutputFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        OutputFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| CliError::Command(format!("failed to initialize tracing subscriber: {e}")))
}
