//! Histogram registry shared by the ingest worker and the metrics endpoint.

mod collector;
mod error;
mod identity;
mod registry;

pub use collector::{Collector, CollectorKind, Recorder};
pub use error::RegistrationError;
pub use identity::MetricIdentity;
pub use registry::{HistogramSample, MetricRegistry, NAMESPACE};
