use crate::registry::MetricRegistry;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::sync::Arc;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Shared with every request handler.
#[derive(Clone)]
pub struct ExporterState {
    registry: Arc<MetricRegistry>,
    metrics_path: Arc<str>,
}

impl ExporterState {
    pub fn new(registry: Arc<MetricRegistry>, metrics_path: &str) -> Self {
        Self {
            registry,
            metrics_path: Arc::from(metrics_path),
        }
    }

    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }
}

pub fn build_router(state: ExporterState) -> Router {
    let metrics_path = state.metrics_path.clone();

    Router::new()
        .route("/", get(landing))
        .route(&metrics_path, get(metrics))
        .with_state(state)
}

pub(crate) async fn metrics(State(state): State<ExporterState>) -> Response {
    match state.registry.encode_text() {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) async fn landing(State(state): State<ExporterState>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>Varnish Request Exporter</title></head>\n\
         <body>\n\
         <h1>Varnish Request Exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        state.metrics_path
    ))
}
