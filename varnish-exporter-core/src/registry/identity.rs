use crate::observe::{MetricName, Observation};
use smallvec::SmallVec;
use std::fmt;

/// Which collector an observation belongs to: metric name plus sorted label names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricIdentity {
    metric: MetricName,
    label_names: SmallVec<[&'static str; 5]>,
}

impl MetricIdentity {
    pub fn new(metric: MetricName, label_names: impl IntoIterator<Item = &'static str>) -> Self {
        let mut label_names: SmallVec<[&'static str; 5]> = label_names.into_iter().collect();
        label_names.sort_unstable();
        label_names.dedup();
        Self {
            metric,
            label_names,
        }
    }

    pub fn of(observation: &Observation) -> Self {
        Self::new(observation.metric, observation.labels.names())
    }

    pub fn metric(&self) -> MetricName {
        self.metric
    }

    pub fn label_names(&self) -> &[&'static str] {
        &self.label_names
    }
}

impl fmt::Display for MetricIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.metric, self.label_names.join(","))
    }
}
