use crate::conf::{DEFAULT_LISTEN_ADDR, DEFAULT_METRICS_PATH, DEFAULT_PROGRAM, ExporterSettings};
use crate::logging::{LogFormat, default_log_format};
use clap::Args;
use std::path::PathBuf;

/// Flags shared by `run` and `command`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ExporterArgs {
    /// Host/port for HTTP server
    #[arg(long = "http.port", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Prometheus metrics path
    #[arg(long = "http.metricsurl", default_value = DEFAULT_METRICS_PATH)]
    pub metrics_path: String,

    /// Virtual host to look for in Varnish logs (defaults to all hosts)
    #[arg(long = "varnish.host")]
    pub host: Option<String>,

    /// Name of file with path mappings
    #[arg(long = "varnish.path-mappings")]
    pub path_mappings: Option<PathBuf>,

    /// Name of Varnish instance
    #[arg(long = "varnish.instance")]
    pub instance: Option<String>,

    /// Also export metrics for backend time to first byte
    #[arg(long = "varnish.firstbyte")]
    pub first_byte: bool,

    /// VSL query, combined with the host restriction when both are given
    #[arg(long = "varnish.query")]
    pub query: Option<String>,

    /// Also export metrics for response size
    #[arg(long = "varnish.sizes")]
    pub sizes: bool,

    /// Read log lines from stdin instead of running varnishncsa
    #[arg(long = "varnish.stdin")]
    pub stdin: bool,

    /// varnishncsa executable
    #[arg(long = "varnish.program", default_value = DEFAULT_PROGRAM)]
    pub program: String,

    /// Write the process id to this file while running
    #[arg(long = "pid-file")]
    pub pid_file: Option<PathBuf>,
}

impl ExporterArgs {
    pub fn settings(&self) -> ExporterSettings {
        ExporterSettings {
            listen_addr: self.listen_addr.clone(),
            metrics_path: self.metrics_path.clone(),
            host: self.host.clone(),
            path_mappings: self.path_mappings.clone(),
            instance: self.instance.clone(),
            first_byte: self.first_byte,
            query: self.query.clone(),
            sizes: self.sizes,
            stdin: self.stdin,
            program: self.program.clone(),
            pid_file: self.pid_file.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LogArgs {
    /// Log level, used when RUST_LOG is unset
    #[arg(long = "log.level", default_value = "info")]
    pub level: String,

    /// Log output format (json when stderr is not a terminal)
    #[arg(long = "log.format", value_enum)]
    pub format: Option<LogFormat>,
}

impl LogArgs {
    pub fn format(&self) -> LogFormat {
        self.format.unwrap_or_else(default_log_format)
    }
}
