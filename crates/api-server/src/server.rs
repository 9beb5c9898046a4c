//! API server: the management API plus operational endpoints, and the metrics exporter.

use crate::rest::{self, AppState};
use adpilot_core::config::AppConfig;
use adpilot_genai::GenerationCollaborator;
use adpilot_management::{management_router, ManagementState};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    collaborator: Arc<dyn GenerationCollaborator>,
    collaborator_name: &'static str,
}

impl ApiServer {
    pub fn new(
        config: AppConfig,
        collaborator: Arc<dyn GenerationCollaborator>,
        collaborator_name: &'static str,
    ) -> Self {
        Self {
            config,
            collaborator,
            collaborator_name,
        }
    }

    /// Full application router with middleware applied.
    pub fn router(&self) -> Router {
        let state = AppState {
            collaborator: self.collaborator_name,
            start_time: Instant::now(),
        };
        let management = ManagementState::new(self.collaborator.clone(), &self.config.wizard);

        Router::new()
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .with_state(state)
            .merge(management_router(management))
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, collaborator = self.collaborator_name, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Start the Prometheus exporter on its own port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            info!("Metrics exporter disabled");
            return Ok(());
        }
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpilot_genai::OfflineCollaborator;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server() -> ApiServer {
        ApiServer::new(AppConfig::default(), Arc::new(OfflineCollaborator::new()), "offline")
    }

    #[tokio::test]
    async fn test_health_reports_collaborator() {
        let app = server().router();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["collaborator"], "offline");
    }

    #[tokio::test]
    async fn test_management_routes_are_mounted() {
        let app = server().router();
        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/campaigns").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
