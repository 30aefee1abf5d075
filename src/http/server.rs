//! Metrics exporter HTTP server.
//!
//! # Responsibilities
//! - Serve `GET /metrics` in the Prometheus text exposition format
//! - Serve `GET /healthz` for liveness checks
//! - Shut down gracefully on the shutdown signal

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::observability::metrics::LatencyMetrics;

/// Content type of the Prometheus text format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP server exposing the latency aggregations.
pub struct MetricsServer {
    router: Router,
}

impl MetricsServer {
    pub fn new(metrics: Arc<LatencyMetrics>) -> Self {
        Self {
            router: Self::build_router(metrics),
        }
    }

    #[allow(deprecated)]
    fn build_router(metrics: Arc<LatencyMetrics>) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/healthz", get(healthz_handler))
            .with_state(metrics)
            .layer(TimeoutLayer::new(SCRAPE_TIMEOUT))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for embedding or in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Metrics server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Metrics server stopped");
        Ok(())
    }
}

async fn metrics_handler(State(metrics): State<Arc<LatencyMetrics>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}

async fn healthz_handler() -> &'static str {
    "ok"
}
