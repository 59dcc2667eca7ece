mod args;
mod check;
mod command;
#[cfg(test)]
mod tests;

pub use args::{ExporterArgs, LogArgs};
pub use check::{check, check_mappings, config_error_hint};
pub use command::{command_line_for, print_command};
