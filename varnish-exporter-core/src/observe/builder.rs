use crate::decode::{DecodedFields, FieldName};
use crate::observe::{LabelSchema, LabelSet, MetricName, Observation, ObservationError, labels};
use crate::rewrite::PathRewriter;
use smallvec::SmallVec;
use std::sync::Arc;

/// At most one observation per metric.
pub type Observations = SmallVec<[Observation; 3]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationOptions {
    /// Emit the `host` label. Off when the deployment is pinned to one host.
    pub host_label: bool,
    pub first_byte: bool,
    pub sizes: bool,
}

impl Default for ObservationOptions {
    fn default() -> Self {
        Self {
            host_label: true,
            first_byte: false,
            sizes: false,
        }
    }
}

pub struct ObservationBuilder {
    rewriter: Arc<PathRewriter>,
    schema: LabelSchema,
    options: ObservationOptions,
}

impl ObservationBuilder {
    pub fn new(rewriter: Arc<PathRewriter>, options: ObservationOptions) -> Self {
        Self {
            rewriter,
            schema: LabelSchema::new(options.host_label),
            options,
        }
    }

    pub fn schema(&self) -> &LabelSchema {
        &self.schema
    }

    pub fn options(&self) -> ObservationOptions {
        self.options
    }

    /// Build the observations for one decoded line.
    ///
    /// The request duration is always produced; first-byte time and response size
    /// only when enabled and present on the line. Time fields are milliseconds and
    /// are recorded in seconds.
    pub fn build(&self, fields: &DecodedFields) -> Result<Observations, ObservationError> {
        let series = self.label_set(fields)?;
        let mut out = Observations::new();

        let time = number(fields, FieldName::Time)?.ok_or(ObservationError::MissingField {
            field: FieldName::Time,
        })?;

        let first_byte = if self.options.first_byte {
            number(fields, FieldName::TimeFirstByte)?
        } else {
            None
        };

        let size = if self.options.sizes {
            number(fields, FieldName::RespSize)?
        } else {
            None
        };

        out.push(Observation {
            metric: MetricName::RequestDuration,
            labels: series.clone(),
            value: time / 1000.0,
        });

        if let Some(ms) = first_byte {
            out.push(Observation {
                metric: MetricName::FirstByteDuration,
                labels: series.clone(),
                value: ms / 1000.0,
            });
        }

        if let Some(bytes) = size {
            out.push(Observation {
                metric: MetricName::ResponseSize,
                labels: series,
                value: bytes,
            });
        }

        Ok(out)
    }

    fn label_set(&self, fields: &DecodedFields) -> Result<LabelSet, ObservationError> {
        let method = required(fields, FieldName::Method)?;
        let status = required(fields, FieldName::Status)?;
        let path = required(fields, FieldName::Path)?;

        let mut set = LabelSet::new()
            .with(labels::METHOD, method)
            .with(labels::STATUS, status)
            .with(labels::PATH, self.rewriter.normalize(path))
            .with(labels::CACHE, fields.get(FieldName::Cache).unwrap_or_default());

        // Absent optional sources become empty values so the label names never vary.
        if self.schema.includes(labels::HOST) {
            set.push(labels::HOST, fields.get(FieldName::Host).unwrap_or_default());
        }

        Ok(set)
    }
}

fn required(fields: &DecodedFields, field: FieldName) -> Result<&str, ObservationError> {
    fields
        .get(field)
        .ok_or(ObservationError::MissingField { field })
}

fn number(fields: &DecodedFields, field: FieldName) -> Result<Option<f64>, ObservationError> {
    let Some(raw) = fields.get(field) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(ObservationError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}
