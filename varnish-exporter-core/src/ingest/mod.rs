//! The per-line pipeline: decode, build observations, record.

mod counters;
mod pipeline;

pub use counters::{IngestCounters, MESSAGES_COUNTER, PARSE_FAILURE_COUNTER};
pub use pipeline::{IngestLoop, IngestSummary, LineOutcome};
