use std::net::SocketAddr;

use axum::Router;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::{ServiceExt as _, transport::stdio};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::cors::CorsConfig;
use crate::errors::ServerError;
use crate::server::Transport;

use super::{Config, Running, shutdown_signal};

pub(super) struct Starting {
    pub(super) config: Config,
    pub(super) running: Running,
}

impl Starting {
    pub(super) async fn start(self) -> Result<(), ServerError> {
        match self.config.transport {
            Transport::StreamableHttp {
                address,
                port,
                stateful_mode,
            } => {
                info!(port = ?port, address = ?address, "Starting MCP server in Streamable HTTP mode");
                let router = router(self.running, stateful_mode, &self.config.cors)?;
                let listener = tokio::net::TcpListener::bind(SocketAddr::new(address, port)).await?;
                info!(address = %listener.local_addr()?, "Serving MCP at /mcp");

                axum::serve(listener, router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
            Transport::SSE { .. } => {
                return Err(ServerError::UnsupportedTransport(
                    "SSE transport is not supported. Use `transport: { type: streamable_http }` instead."
                        .to_string(),
                ));
            }
            Transport::Stdio => {
                info!("Starting MCP server in stdio mode");
                let service = self
                    .running
                    .serve(stdio())
                    .await
                    .inspect_err(|e| {
                        error!("serving error: {:?}", e);
                    })
                    .map_err(Box::new)?;
                service.waiting().await?;
            }
        }

        Ok(())
    }
}

/// The HTTP routes of the streamable HTTP transport
pub(super) fn router(
    running: Running,
    stateful_mode: bool,
    cors: &CorsConfig,
) -> Result<Router, ServerError> {
    let service = StreamableHttpService::new(
        move || Ok(running.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode,
            ..Default::default()
        },
    );

    let mut router = Router::new().nest_service("/mcp", service);
    if cors.enabled {
        router = router.layer(cors.build_cors_layer().inspect_err(|e| {
            error!("Failed to build CORS layer: {e}");
        })?);
    }
    Ok(router.layer(TraceLayer::new_for_http()))
}
