pub mod exporter;
pub mod tracing;

pub use exporter::{TestExporter, free_port, metric_value, wait_for_server};
pub use tracing::{CapturedEvent, EventLog, events_for_line, init_test_tracing};
