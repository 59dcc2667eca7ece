use crate::harness::{CapturedEvent, EventLog, init_test_tracing};
use reqwest::blocking::{Client, RequestBuilder};
use std::io::Cursor;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use varnish_exporter_core::decode::{FieldOptions, FieldSpec, LineDecoder};
use varnish_exporter_core::ingest::{IngestCounters, IngestLoop, IngestSummary};
use varnish_exporter_core::observe::{ObservationBuilder, ObservationOptions};
use varnish_exporter_core::registry::MetricRegistry;
use varnish_exporter_core::rewrite::PathRewriter;
use varnish_exporter_core::server::{ExporterState, build_router};

/// In-process exporter: the ingest pipeline plus the HTTP endpoint on a free port.
pub struct TestExporter {
    base_url: String,
    client: Client,
    ingest: IngestLoop,
    registry: Arc<MetricRegistry>,
}

impl TestExporter {
    /// Start an exporter with the given rules and options.
    ///
    /// Ports are allocated dynamically, so tests may run in parallel.
    pub fn start(rewriter: PathRewriter, options: ObservationOptions) -> Self {
        init_test_tracing(events());

        let registry = Arc::new(MetricRegistry::default());
        let counters = IngestCounters::register(&registry).expect("failed to register counters");
        let spec = FieldSpec::new(FieldOptions {
            first_byte: options.first_byte,
            sizes: options.sizes,
        });
        let ingest = IngestLoop::new(
            LineDecoder::new(spec),
            ObservationBuilder::new(Arc::new(rewriter), options),
            registry.clone(),
            counters,
        );

        let port = free_port();
        let router = build_router(ExporterState::new(registry.clone(), "/metrics"));

        // Serve in a background thread with its own runtime.
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("failed to build test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                    .await
                    .expect("failed to bind test listener");
                axum::serve(listener, router)
                    .await
                    .expect("test server failed");
            });
        });

        let base_url = format!("http://127.0.0.1:{port}");
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            client,
            ingest,
            registry,
        }
    }

    /// Push lines through the pipeline, as if varnishncsa had written them.
    pub fn feed(&self, lines: &[&str]) -> IngestSummary {
        let input = lines.iter().map(|l| format!("{l}\n")).collect::<String>();
        self.ingest
            .run(Cursor::new(input))
            .expect("in-memory input cannot fail")
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    /// Scrape `/metrics` and return the body.
    pub fn scrape(&self) -> String {
        let res = self.get("/metrics").send().expect("scrape failed");
        assert_eq!(res.status(), 200);
        res.text().expect("scrape body")
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        events().lock().unwrap().clone()
    }
}

/// Value of the exposition line starting with `series` (name plus labels).
pub fn metric_value(exposition: &str, series: &str) -> Option<f64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (name, value) = line.rsplit_once(' ')?;
            (name == series).then(|| value.parse().ok()).flatten()
        })
}

/// Poll until the server accepts connections (or panic).
pub fn wait_for_server(base_url: &str) {
    let addr = base_url.strip_prefix("http://").unwrap_or(base_url);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", base_url);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<EventLog> = OnceLock::new();

fn events() -> EventLog {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
