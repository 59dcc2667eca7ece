use crate::conf::{ExporterConfig, ExporterSettings, LineSource};
use crate::decode::FieldSpec;
use crate::producer::VarnishncsaCommand;
use anyhow::Context;

pub fn print_command(settings: ExporterSettings) -> anyhow::Result<()> {
    let config = ExporterConfig::from_settings(settings).context("invalid configuration")?;

    match command_line_for(&config) {
        Some(line) => println!("{line}"),
        None => println!("# --varnish.stdin: no producer is started, lines are read from stdin"),
    }
    Ok(())
}

/// The producer command `run` would execute, or `None` in stdin mode.
pub fn command_line_for(config: &ExporterConfig) -> Option<String> {
    match &config.source {
        LineSource::Varnishncsa(src) => {
            let spec = FieldSpec::new(config.fields);
            Some(VarnishncsaCommand::from_source(src, &spec).command_line())
        }
        LineSource::Stdin => None,
    }
}
