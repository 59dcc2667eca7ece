//! The varnishncsa child process that writes the log lines we consume.

mod command;
mod error;
mod process;

pub use command::{VarnishncsaCommand, build_vsl_query};
pub use error::ProducerError;
pub use process::ProducerProcess;
