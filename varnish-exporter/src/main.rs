use clap::{Parser, Subcommand};
use std::path::PathBuf;
use varnish_exporter_core::cli::{self, ExporterArgs, LogArgs};
use varnish_exporter_core::conf::{ConfigError, ExporterConfig};
use varnish_exporter_core::logging::init_logging;
use varnish_exporter_core::server;

#[derive(Parser, Debug)]
#[command(
    name = "varnish-exporter",
    version,
    about = "Prometheus exporter for Varnish request logs",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    exporter: ExporterArgs,

    #[command(flatten)]
    log: LogArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the exporter (default)
    Run {
        #[command(flatten)]
        exporter: ExporterArgs,

        #[command(flatten)]
        log: LogArgs,
    },

    /// Validate a path mappings file and exit
    Check {
        /// Path mappings file
        #[arg(long = "varnish.path-mappings")]
        path_mappings: PathBuf,

        /// Sample path to normalize (repeatable)
        #[arg(long = "path")]
        paths: Vec<String>,
    },

    /// Print the varnishncsa command line `run` would execute
    Command {
        #[command(flatten)]
        exporter: ExporterArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Run { exporter, log }) => run(exporter, log),
        Some(Command::Check {
            path_mappings,
            paths,
        }) => cli::check(&path_mappings, &paths).map(|_| 0),
        Some(Command::Command { exporter }) => {
            cli::print_command(exporter.settings()).map(|_| 0)
        }
        None => run(cli.exporter, cli.log),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("varnish-exporter: {e:#}");
            if let Some(hint) = e.downcast_ref::<ConfigError>().and_then(cli::config_error_hint) {
                eprintln!();
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
    }
}

fn run(exporter: ExporterArgs, log: LogArgs) -> anyhow::Result<i32> {
    init_logging(&log.level, log.format());

    let config = ExporterConfig::from_settings(exporter.settings())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "varnish request exporter starting");

    server::run(config)
}
