//! Turning decoded log fields into histogram observations.

mod builder;
mod error;
mod types;
#[cfg(test)]
mod tests;

pub use builder::{ObservationBuilder, ObservationOptions, Observations};
pub use error::ObservationError;
pub use types::{LabelSchema, LabelSet, MetricName, Observation, labels};
