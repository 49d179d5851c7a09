// HTTP serving
//
// Request/response surface for the assistant: one chat endpoint plus a
// liveness check. Requests are independent; the only state shared between
// them is the immutable orchestrator (tool catalog, clients, prompt).

mod handlers;

pub use handlers::{create_router, ChatRequest, ChatResponse, ChatTurn};

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::chat::Orchestrator;

pub struct AppServer {
    orchestrator: Arc<Orchestrator>,
}

impl AppServer {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Start serving on the given address; runs until the process stops.
    pub async fn serve(self, bind_address: &str) -> Result<()> {
        let addr: SocketAddr = bind_address.parse()?;

        let app = create_router(Arc::new(self))
            .layer(TraceLayer::new_for_http())
            // The React frontend runs on its own origin
            .layer(CorsLayer::permissive());

        tracing::info!("Starting EduLingua assistant server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }
}
