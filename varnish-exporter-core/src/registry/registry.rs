use crate::observe::{LabelSet, MetricName, Observation};
use crate::registry::{Collector, CollectorKind, MetricIdentity, Recorder, RegistrationError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

/// Prefix of every metric this exporter publishes.
pub const NAMESPACE: &str = "varnish_request";

/// Count and sum of one histogram series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSample {
    pub count: u64,
    pub sum: f64,
}

/// Owns every collector for the life of the process.
///
/// Entries are created on first observation and never replaced or removed. The
/// map lock is held only while looking up or inserting an entry; recording goes
/// through the histogram's own atomics.
pub struct MetricRegistry {
    namespace: String,
    registry: Registry,
    entries: DashMap<MetricIdentity, Collector>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new(NAMESPACE)
    }
}

impl MetricRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            registry: Registry::new(),
            entries: DashMap::new(),
        }
    }

    /// Record one observation, creating its histogram on first use.
    pub fn record(&self, observation: &Observation) -> Result<(), RegistrationError> {
        let identity = MetricIdentity::of(observation);
        let collector = self.get_or_create(identity, CollectorKind::Histogram)?;
        collector.record(&observation.labels, observation.value)
    }

    /// Fetch the collector for `identity`, creating and registering it exactly once.
    ///
    /// Concurrent first calls for the same identity serialize on the map shard, so
    /// only one collector is ever built and registered.
    pub fn get_or_create(
        &self,
        identity: MetricIdentity,
        kind: CollectorKind,
    ) -> Result<Collector, RegistrationError> {
        if let Some(existing) = self.entries.get(&identity) {
            return ensure_kind(&identity, existing.value(), kind);
        }

        match self.entries.entry(identity) {
            Entry::Occupied(entry) => ensure_kind(entry.key(), entry.get(), kind),
            Entry::Vacant(entry) => {
                let collector = Collector::build(kind, &self.namespace, entry.key())?;
                self.registry
                    .register(collector.boxed())
                    .map_err(|source| RegistrationError::Rejected {
                        name: self.qualified(entry.key().metric().as_str()),
                        source,
                    })?;

                tracing::debug!(identity = %entry.key(), kind = ?kind, "collector created");

                entry.insert(collector.clone());
                Ok(collector)
            }
        }
    }

    /// Register a bookkeeping counter alongside the histograms.
    pub fn counter(&self, name: &str, help: &str) -> Result<IntCounter, RegistrationError> {
        let qualified = self.qualified(name);
        let counter = IntCounter::with_opts(Opts::new(name, help).namespace(self.namespace.clone()))
            .map_err(|source| RegistrationError::Build {
                name: qualified.clone(),
                source,
            })?;

        self.registry
            .register(Box::new(counter.clone()))
            .map_err(|source| RegistrationError::Rejected {
                name: qualified,
                source,
            })?;

        Ok(counter)
    }

    /// Number of histogram collectors created so far.
    pub fn collector_count(&self) -> usize {
        self.entries.len()
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Prometheus text exposition of everything registered.
    pub fn encode_text(&self) -> Result<String, RegistrationError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.gather(), &mut buffer)
            .map_err(|source| RegistrationError::Encode { source })?;

        String::from_utf8(buffer).map_err(|e| RegistrationError::Encode {
            source: prometheus::Error::Msg(e.to_string()),
        })
    }

    /// Count and sum of the series `metric{labels}`, if it has been observed.
    pub fn histogram_sample(&self, metric: MetricName, labels: &LabelSet) -> Option<HistogramSample> {
        let name = self.qualified(metric.as_str());
        let families = self.gather();

        families
            .iter()
            .filter(|family| family.get_name() == name)
            .flat_map(|family| family.get_metric())
            .find(|m| {
                let pairs = m.get_label();
                pairs.len() == labels.len()
                    && pairs
                        .iter()
                        .all(|pair| labels.get(pair.get_name()) == Some(pair.get_value()))
            })
            .map(|m| {
                let histogram = m.get_histogram();
                HistogramSample {
                    count: histogram.get_sample_count(),
                    sum: histogram.get_sample_sum(),
                }
            })
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}_{}", self.namespace, name)
    }
}

fn ensure_kind(
    identity: &MetricIdentity,
    existing: &Collector,
    requested: CollectorKind,
) -> Result<Collector, RegistrationError> {
    if existing.kind() != requested {
        return Err(RegistrationError::KindMismatch {
            name: identity.to_string(),
            existing: existing.kind(),
            requested,
        });
    }
    Ok(existing.clone())
}
