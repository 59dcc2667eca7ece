use crate::conf::{ConfigError, load_rewriter};
use crate::rewrite::PathRewriter;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

pub fn check(path: &Path, samples: &[String]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    match check_mappings(path, samples, &mut stdout.lock()) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<ConfigError>() {
            Some(config_err) => {
                print_config_error(config_err);
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}

/// Compile the rules in `path` and write a report, with the normalization of each sample.
///
/// Fails with a [`ConfigError`] when the rules do not load, or with the write error
/// when the report cannot be written.
pub fn check_mappings<W: Write>(path: &Path, samples: &[String], out: &mut W) -> anyhow::Result<()> {
    let rewriter = load_rewriter(Some(path))?;
    write_report(out, &rewriter, samples).context("failed to write check report")
}

fn write_report<W: Write>(
    out: &mut W,
    rewriter: &PathRewriter,
    samples: &[String],
) -> std::io::Result<()> {
    writeln!(out, "✔ Path mappings loaded successfully")?;
    writeln!(out, "✔ {} rules", rewriter.len())?;
    writeln!(
        out,
        "✔ {} strip rules",
        rewriter.rules().iter().filter(|r| r.is_strip()).count()
    )?;
    for sample in samples {
        writeln!(out, "  {sample} => {}", rewriter.normalize(sample))?;
    }
    out.flush()
}

fn print_config_error(err: &ConfigError) {
    eprintln!("{err}");
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::InvalidRule { .. } => Some(
            "Each rule is a regular expression, optionally followed by whitespace and a replacement.\n\
             \n\
             Example:\n\
             \n\
             /[0-9]+/   /ID/     # numeric ids\n\
             /$                  # strip trailing slash\n\
             \n\
             Use $1 or ${name} in the replacement to refer to capture groups.",
        ),

        ConfigError::ReadFile { .. } => Some(
            "Check that the path exists and is readable by the exporter user.",
        ),

        ConfigError::InvalidListenAddress { .. } => Some(
            "Use host:port, or :port to listen on all interfaces.\n\
             \n\
             Example: --http.port :9151",
        ),

        ConfigError::InvalidMetricsPath { .. } => Some(
            "The metrics path must be absolute and must not be the landing page.\n\
             \n\
             Example: --http.metricsurl /metrics",
        ),
    }
}
