use crate::conf::{ConfigError, load_rewriter, normalize_listen_addr, validate_metrics_path};
use crate::decode::FieldOptions;
use crate::observe::ObservationOptions;
use crate::rewrite::PathRewriter;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_LISTEN_ADDR: &str = ":9151";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_PROGRAM: &str = "varnishncsa";

/// Raw flag values, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterSettings {
    pub listen_addr: String,
    pub metrics_path: String,
    pub host: Option<String>,
    pub path_mappings: Option<PathBuf>,
    pub instance: Option<String>,
    pub first_byte: bool,
    pub query: Option<String>,
    pub sizes: bool,
    pub stdin: bool,
    pub program: String,
    pub pid_file: Option<PathBuf>,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            host: None,
            path_mappings: None,
            instance: None,
            first_byte: false,
            query: None,
            sizes: false,
            stdin: false,
            program: DEFAULT_PROGRAM.to_string(),
            pid_file: None,
        }
    }
}

/// How to run varnishncsa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarnishncsaSource {
    pub program: String,
    pub instance: Option<String>,
    /// Only requests for this virtual host are logged.
    pub host: Option<String>,
    pub query: Option<String>,
}

/// Where log lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSource {
    Varnishncsa(VarnishncsaSource),
    Stdin,
}

/// Validated configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen_addr: String,
    pub metrics_path: String,
    pub fields: FieldOptions,
    pub observations: ObservationOptions,
    pub source: LineSource,
    pub rewriter: Arc<PathRewriter>,
    pub pid_file: Option<PathBuf>,
}

impl ExporterConfig {
    pub fn from_settings(settings: ExporterSettings) -> Result<Self, ConfigError> {
        let listen_addr = normalize_listen_addr(&settings.listen_addr)?;
        validate_metrics_path(&settings.metrics_path)?;
        let rewriter = load_rewriter(settings.path_mappings.as_deref())?;

        let host = non_empty(settings.host);
        let fields = FieldOptions {
            first_byte: settings.first_byte,
            sizes: settings.sizes,
        };
        let observations = ObservationOptions {
            host_label: host.is_none(),
            first_byte: settings.first_byte,
            sizes: settings.sizes,
        };

        let source = if settings.stdin {
            LineSource::Stdin
        } else {
            LineSource::Varnishncsa(VarnishncsaSource {
                program: settings.program,
                instance: non_empty(settings.instance),
                host,
                query: non_empty(settings.query),
            })
        };

        Ok(Self {
            listen_addr,
            metrics_path: settings.metrics_path,
            fields,
            observations,
            source,
            rewriter: Arc::new(rewriter),
            pid_file: settings.pid_file,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
