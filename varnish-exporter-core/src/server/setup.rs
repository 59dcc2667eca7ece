use crate::conf::{ExporterConfig, LineSource};
use crate::decode::{FieldSpec, LineDecoder};
use crate::ingest::{IngestCounters, IngestLoop, IngestSummary};
use crate::observe::ObservationBuilder;
use crate::producer::VarnishncsaCommand;
use crate::registry::MetricRegistry;
use crate::server::{ExporterState, build_router, pid, wait_for_shutdown};
use anyhow::{Context, Result, anyhow};
use std::io::{self, BufRead, BufReader};
use std::process::ExitStatus;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Run the exporter until a signal arrives or the producer exits.
///
/// Returns the process exit code.
pub fn run(config: ExporterConfig) -> Result<i32> {
    use tokio::runtime::Builder;

    // Attempt to write pid file (best-effort)
    if let Some(pid_file) = &config.pid_file {
        if let Err(e) = pid::write_pid(pid_file) {
            tracing::warn!(error = %e, pid_file = %pid_file.display(), "failed to write pid file; continuing");
        } else {
            tracing::info!(pid_file = %pid_file.display(), "pid file written");
        }
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("exporter-http")
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    let result = runtime.block_on(supervise(&config));

    // The ingest thread and the child wait may still be blocked on the producer.
    runtime.shutdown_background();

    if let Some(pid_file) = &config.pid_file {
        pid::remove_pid(pid_file);
    }

    result
}

async fn supervise(config: &ExporterConfig) -> Result<i32> {
    let registry = Arc::new(MetricRegistry::default());
    let counters =
        IngestCounters::register(&registry).context("failed to register exporter counters")?;
    let spec = FieldSpec::new(config.fields);
    let ingest = IngestLoop::new(
        LineDecoder::new(spec.clone()),
        ObservationBuilder::new(config.rewriter.clone(), config.observations),
        registry.clone(),
        counters.clone(),
    );

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(
        addr = %config.listen_addr,
        metrics_path = %config.metrics_path,
        "starting server"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let router = build_router(ExporterState::new(registry, &config.metrics_path));
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    let mut producer = start_producer(&config.source, &spec, ingest)?;

    let code = tokio::select! {
        signal = wait_for_shutdown() => {
            let signal = signal.context("failed to install signal handlers")?;
            tracing::info!(%signal, "received signal, terminating");
            0
        }
        exit = &mut producer => {
            let status = exit.context("producer supervisor panicked")??;
            tracing::info!(%status, "varnishncsa command exited");
            if status.success() { 0 } else { 1 }
        }
        served = &mut server => {
            served.context("http server panicked")?.context("http server failed")?;
            return Err(anyhow!("http server stopped unexpectedly"));
        }
    };

    tracing::info!(messages = counters.messages(), "messages received");

    let _ = stop_tx.send(());
    Ok(code)
}

/// Start feeding the ingest loop. The returned task resolves when the producer is gone.
fn start_producer(
    source: &LineSource,
    spec: &FieldSpec,
    ingest: IngestLoop,
) -> Result<tokio::task::JoinHandle<Result<ExitStatus>>> {
    match source {
        LineSource::Varnishncsa(src) => {
            let command = VarnishncsaCommand::from_source(src, spec);
            let mut process = command.spawn()?;
            tracing::info!(pid = process.id(), program = process.program(), "producer started");
            let stdout = process.take_stdout()?;
            let reader = spawn_ingest(ingest, BufReader::new(stdout))?;

            Ok(tokio::task::spawn_blocking(move || -> Result<ExitStatus> {
                let status = process.wait()?;
                join_ingest(reader);
                Ok(status)
            }))
        }
        LineSource::Stdin => {
            let reader = spawn_ingest(ingest, BufReader::new(io::stdin()))?;

            Ok(tokio::spawn(async move {
                let _ = tokio::task::spawn_blocking(move || join_ingest(reader)).await;
                tracing::info!("end of input; still serving until terminated");
                std::future::pending::<Result<ExitStatus>>().await
            }))
        }
    }
}

fn spawn_ingest<R>(ingest: IngestLoop, reader: R) -> Result<JoinHandle<io::Result<IngestSummary>>>
where
    R: BufRead + Send + 'static,
{
    std::thread::Builder::new()
        .name("ingest".to_string())
        .spawn(move || ingest.run(reader))
        .context("failed to start ingest thread")
}

fn join_ingest(handle: JoinHandle<io::Result<IngestSummary>>) {
    match handle.join() {
        Ok(Ok(summary)) => tracing::debug!(
            lines = summary.lines,
            rejected = summary.rejected,
            dropped = summary.dropped,
            "ingest finished"
        ),
        Ok(Err(e)) => tracing::error!(error = %e, "failed reading log lines"),
        Err(_) => tracing::error!("ingest thread panicked"),
    }
}
