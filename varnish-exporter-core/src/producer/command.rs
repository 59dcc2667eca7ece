use crate::conf::VarnishncsaSource;
use crate::decode::FieldSpec;
use crate::producer::{ProducerError, ProducerProcess};
use std::process::{Command, Stdio};

/// Combine the user's VSL query with the host restriction, user query first.
pub fn build_vsl_query(host: Option<&str>, user_query: Option<&str>) -> Option<String> {
    let host_query = host.map(|h| format!("ReqHeader:host eq \"{h}\""));

    match (user_query, host_query) {
        (Some(q), Some(h)) => Some(format!("{q} and {h}")),
        (Some(q), None) => Some(q.to_string()),
        (None, Some(h)) => Some(h),
        (None, None) => None,
    }
}

/// Program and argument list for one varnishncsa run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarnishncsaCommand {
    program: String,
    args: Vec<String>,
}

impl VarnishncsaCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `-F` from the field layout, then `-q` and `-n` when configured.
    pub fn from_source(source: &VarnishncsaSource, spec: &FieldSpec) -> Self {
        let mut args = vec!["-F".to_string(), spec.varnishncsa_format()];

        if let Some(query) = build_vsl_query(source.host.as_deref(), source.query.as_deref()) {
            args.push("-q".to_string());
            args.push(query);
        }

        if let Some(instance) = &source.instance {
            args.push("-n".to_string());
            args.push(instance.clone());
        }

        Self::new(source.program.clone(), args)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Shell-pasteable rendering, for logs and the `command` subcommand.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn spawn(&self) -> Result<ProducerProcess, ProducerError> {
        tracing::info!(command = %self.command_line(), "running command");

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProducerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(ProducerProcess::new(self.program.clone(), child))
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
