use crate::observe::{LabelSet, MetricName};
use crate::registry::{MetricIdentity, RegistrationError};
use prometheus::{HistogramOpts, HistogramVec};
use std::fmt;

/// Something that records a numeric observation under a label set.
pub trait Recorder {
    fn record(&self, labels: &LabelSet, value: f64) -> Result<(), RegistrationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorKind {
    Histogram,
}

/// A live collector owned by the registry.
#[derive(Clone)]
pub enum Collector {
    Histogram(HistogramVec),
}

impl Collector {
    pub(crate) fn build(
        kind: CollectorKind,
        namespace: &str,
        identity: &MetricIdentity,
    ) -> Result<Self, RegistrationError> {
        let metric = identity.metric();
        let build_err = |source| RegistrationError::Build {
            name: metric.to_string(),
            source,
        };

        match kind {
            CollectorKind::Histogram => {
                let opts = HistogramOpts::new(metric.as_str(), metric.help())
                    .namespace(namespace)
                    .buckets(buckets(metric).map_err(build_err)?);
                let vec = HistogramVec::new(opts, identity.label_names()).map_err(build_err)?;
                Ok(Collector::Histogram(vec))
            }
        }
    }

    pub fn kind(&self) -> CollectorKind {
        match self {
            Collector::Histogram(_) => CollectorKind::Histogram,
        }
    }

    pub(crate) fn boxed(&self) -> Box<dyn prometheus::core::Collector> {
        match self {
            Collector::Histogram(vec) => Box::new(vec.clone()),
        }
    }
}

impl Recorder for Collector {
    fn record(&self, labels: &LabelSet, value: f64) -> Result<(), RegistrationError> {
        match self {
            Collector::Histogram(vec) => {
                let histogram = vec.get_metric_with(&labels.as_map()).map_err(|source| {
                    RegistrationError::Labels {
                        labels: labels.names().collect::<Vec<_>>().join(","),
                        source,
                    }
                })?;
                histogram.observe(value);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Collector").field(&self.kind()).finish()
    }
}

/// Bucket layout per metric: latency defaults for durations, powers of four for sizes.
fn buckets(metric: MetricName) -> prometheus::Result<Vec<f64>> {
    match metric {
        MetricName::RequestDuration | MetricName::FirstByteDuration => {
            Ok(prometheus::DEFAULT_BUCKETS.to_vec())
        }
        MetricName::ResponseSize => prometheus::exponential_buckets(256.0, 4.0, 10),
    }
}
