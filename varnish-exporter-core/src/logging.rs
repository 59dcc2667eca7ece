use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global subscriber. Call once, before anything logs.
///
/// `RUST_LOG` wins over `level` when set. Output goes to stderr so stdout stays free
/// for the line stream and for subcommand output.
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .flatten_event(true)
            .init(),
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}

pub fn default_log_format() -> LogFormat {
    if io::stderr().is_terminal() {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}
