mod http;
mod pid;
pub mod setup;
mod signal;

pub use http::{ExporterState, build_router};
pub use pid::{remove_pid, write_pid};
pub use setup::run;
pub use signal::{ShutdownSignal, wait_for_shutdown};
