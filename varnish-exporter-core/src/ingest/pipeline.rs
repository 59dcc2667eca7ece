use crate::decode::LineDecoder;
use crate::ingest::IngestCounters;
use crate::observe::ObservationBuilder;
use crate::registry::MetricRegistry;
use std::io::{self, BufRead};
use std::sync::Arc;

/// What happened to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line was understood. `dropped` observations failed to record.
    Recorded { recorded: usize, dropped: usize },
    /// The line was discarded before anything was recorded.
    Rejected,
}

/// Totals for one pass over a line stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub lines: u64,
    pub rejected: u64,
    pub dropped: u64,
}

/// Single consumer of the producer's output.
///
/// Lines are handled strictly in arrival order. No per-line failure stops the loop;
/// every failure is counted and logged.
pub struct IngestLoop {
    decoder: LineDecoder,
    builder: ObservationBuilder,
    registry: Arc<MetricRegistry>,
    counters: IngestCounters,
}

impl IngestLoop {
    pub fn new(
        decoder: LineDecoder,
        builder: ObservationBuilder,
        registry: Arc<MetricRegistry>,
        counters: IngestCounters,
    ) -> Self {
        Self {
            decoder,
            builder,
            registry,
            counters,
        }
    }

    pub fn counters(&self) -> &IngestCounters {
        &self.counters
    }

    pub fn process_line(&self, line: &str) -> LineOutcome {
        self.counters.message();

        let fields = match self.decoder.decode(line) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::debug!(error = %e, line, "failed to decode log line");
                self.counters.failure();
                return LineOutcome::Rejected;
            }
        };

        let observations = match self.builder.build(&fields) {
            Ok(observations) => observations,
            Err(e) => {
                tracing::debug!(error = %e, line, "failed to build observations");
                self.counters.failure();
                return LineOutcome::Rejected;
            }
        };

        let mut recorded = 0;
        let mut dropped = 0;
        for observation in &observations {
            match self.registry.record(observation) {
                Ok(()) => recorded += 1,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        metric = %observation.metric,
                        "dropping observation"
                    );
                    self.counters.failure();
                    dropped += 1;
                }
            }
        }

        LineOutcome::Recorded { recorded, dropped }
    }

    /// Consume `reader` to end of input.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so that one bad byte costs at
    /// most one line.
    pub fn run<R: BufRead>(&self, mut reader: R) -> io::Result<IngestSummary> {
        let mut summary = IngestSummary::default();
        let mut buf = Vec::with_capacity(512);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);

            summary.lines += 1;
            match self.process_line(line) {
                LineOutcome::Recorded { dropped, .. } => summary.dropped += dropped as u64,
                LineOutcome::Rejected => summary.rejected += 1,
            }
        }

        tracing::debug!(
            lines = summary.lines,
            rejected = summary.rejected,
            dropped = summary.dropped,
            "line stream ended"
        );

        Ok(summary)
    }
}
