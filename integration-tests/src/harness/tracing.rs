use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, layer::Context};

/// Only events from the exporter library are kept.
const EXPORTER_TARGET: &str = "varnish_exporter_core";

/// Shared buffer the capture layer appends to.
pub type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

/// One exporter log event, with the message split from its structured fields.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    /// Module path, e.g. `varnish_exporter_core::ingest::pipeline`.
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The raw log line an ingest event refers to.
    pub fn line(&self) -> Option<&str> {
        self.field("line")
    }

    pub fn error(&self) -> Option<&str> {
        self.field("error")
    }

    /// Metric name on registration events (`time`, `time_firstbyte`, `respsize`).
    pub fn metric(&self) -> Option<&str> {
        self.field("metric")
    }

    /// Emitted by the per-line pipeline rather than startup or shutdown code.
    pub fn is_ingest(&self) -> bool {
        self.target.starts_with(&format!("{EXPORTER_TARGET}::ingest"))
    }
}

/// Events about `line`, oldest first.
pub fn events_for_line<'a>(events: &'a [CapturedEvent], line: &str) -> Vec<&'a CapturedEvent> {
    events.iter().filter(|e| e.line() == Some(line)).collect()
}

struct ExporterCapture {
    log: EventLog,
}

/// Install the capturing subscriber once per test binary.
pub fn init_test_tracing(log: EventLog) {
    static INIT: std::sync::Once = std::sync::Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::registry().with(ExporterCapture { log });

        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set global tracing subscriber");
    });
}

impl<S> Layer<S> for ExporterCapture
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if !meta.target().starts_with(EXPORTER_TARGET) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.log.lock().unwrap().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}
