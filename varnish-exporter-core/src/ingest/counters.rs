use crate::registry::{MetricRegistry, RegistrationError};
use prometheus::IntCounter;

pub const MESSAGES_COUNTER: &str = "exporter_log_messages";
pub const PARSE_FAILURE_COUNTER: &str = "exporter_log_parse_failure";

/// Bookkeeping counters, exposed next to the histograms.
#[derive(Debug, Clone)]
pub struct IngestCounters {
    messages: IntCounter,
    failures: IntCounter,
}

impl IngestCounters {
    pub fn register(registry: &MetricRegistry) -> Result<Self, RegistrationError> {
        Ok(Self {
            messages: registry.counter(MESSAGES_COUNTER, "Current total log messages received.")?,
            failures: registry.counter(
                PARSE_FAILURE_COUNTER,
                "Number of errors while parsing log messages.",
            )?,
        })
    }

    pub fn messages(&self) -> u64 {
        self.messages.get()
    }

    pub fn failures(&self) -> u64 {
        self.failures.get()
    }

    pub(crate) fn message(&self) {
        self.messages.inc();
    }

    pub(crate) fn failure(&self) {
        self.failures.inc();
    }
}
