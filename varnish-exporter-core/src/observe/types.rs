use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// Label names, in the order they appear in every label set.
pub mod labels {
    pub const METHOD: &str = "method";
    pub const STATUS: &str = "status";
    pub const PATH: &str = "path";
    pub const CACHE: &str = "cache";
    pub const HOST: &str = "host";
}

/// Histograms derived from access log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricName {
    /// Total request time, seconds.
    RequestDuration,
    /// Backend time to first byte, seconds.
    FirstByteDuration,
    /// Response body size, bytes.
    ResponseSize,
}

impl MetricName {
    /// Metric name without the exporter namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RequestDuration => "time",
            MetricName::FirstByteDuration => "time_firstbyte",
            MetricName::ResponseSize => "respsize",
        }
    }

    pub fn help(&self) -> String {
        format!("Varnish request log value for {}", self.as_str())
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label names every observation carries, fixed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSchema {
    names: SmallVec<[&'static str; 5]>,
}

impl LabelSchema {
    /// `host_label` is off when the deployment is pinned to one virtual host.
    pub fn new(host_label: bool) -> Self {
        let mut names: SmallVec<[&'static str; 5]> = SmallVec::new();
        names.extend_from_slice(&[labels::METHOD, labels::STATUS, labels::PATH, labels::CACHE]);
        if host_label {
            names.push(labels::HOST);
        }
        Self { names }
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn includes(&self, name: &str) -> bool {
        self.names.contains(&name)
    }
}

/// Ordered label name/value pairs for one series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelSet {
    pairs: SmallVec<[(&'static str, String); 5]>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.pairs.push((name, value.into()));
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Name to value lookup, as the prometheus label API expects.
    pub fn as_map(&self) -> HashMap<&str, &str> {
        self.pairs.iter().map(|(n, v)| (*n, v.as_str())).collect()
    }
}

/// One value destined for one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub metric: MetricName,
    pub labels: LabelSet,
    pub value: f64,
}
