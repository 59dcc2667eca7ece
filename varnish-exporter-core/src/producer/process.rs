use crate::producer::ProducerError;
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, ExitStatus};
use std::thread::JoinHandle;

/// A running producer. Stderr is forwarded to the log as it arrives.
pub struct ProducerProcess {
    program: String,
    child: Child,
    stderr: Option<JoinHandle<()>>,
}

impl ProducerProcess {
    pub(crate) fn new(program: String, mut child: Child) -> Self {
        let stderr = child.stderr.take().map(|pipe| {
            let program = program.clone();
            std::thread::spawn(move || {
                for line in BufReader::new(pipe).lines() {
                    match line {
                        Ok(line) if line.trim().is_empty() => {}
                        Ok(line) => tracing::warn!(program = %program, "{line}"),
                        Err(_) => break,
                    }
                }
            })
        });

        Self {
            program,
            child,
            stderr,
        }
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Hand the stdout pipe to the consumer. Only the first call succeeds.
    pub fn take_stdout(&mut self) -> Result<ChildStdout, ProducerError> {
        self.child
            .stdout
            .take()
            .ok_or_else(|| ProducerError::MissingStdout {
                program: self.program.clone(),
            })
    }

    /// Block until the child exits and its stderr has drained.
    pub fn wait(mut self) -> Result<ExitStatus, ProducerError> {
        let status = self.child.wait().map_err(|source| ProducerError::Wait {
            program: self.program.clone(),
            source,
        })?;

        if let Some(handle) = self.stderr.take() {
            let _ = handle.join();
        }

        Ok(status)
    }
}
