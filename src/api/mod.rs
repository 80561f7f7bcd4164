//! REST API server for Briefly.
//!
//! Provides HTTP endpoints for:
//! - Session control (start, stop, process, status)
//! - Service info and version

pub mod error;
pub mod routes;

use crate::session::SessionStatusHandle;
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::sessions::{ApiCommand, SessionsState};

pub struct ApiServer {
    port: u16,
    sessions_state: SessionsState,
}

impl ApiServer {
    pub fn new(
        port: u16,
        tx: tokio::sync::mpsc::Sender<ApiCommand>,
        status: SessionStatusHandle,
    ) -> Self {
        Self {
            port,
            sessions_state: SessionsState { tx, status },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::sessions::router(self.sessions_state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                  - Service info");
        info!("  GET  /version           - Version info");
        info!("  POST /sessions/start    - Start a recording session");
        info!("  POST /sessions/stop     - Stop recording and process");
        info!("  POST /sessions/process  - Re-run processing for a stopped session");
        info!("  GET  /sessions/status   - Poll session status");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "briefly",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "briefly"
    }))
}
