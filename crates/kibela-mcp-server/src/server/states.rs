use std::sync::Arc;

use tracing::{error, info};

use crate::cors::CorsConfig;
use crate::dispatcher::Dispatcher;
use crate::errors::ServerError;
use crate::registry::ToolRegistry;
use crate::server::{Server, Transport};

mod running;
mod starting;

use running::Running;
use starting::Starting;

pub(super) struct StateMachine {}

/// Settings carried from the server into its running state
pub(super) struct Config {
    pub(super) transport: Transport,
    pub(super) cors: CorsConfig,
}

impl StateMachine {
    pub(crate) async fn start(self, server: Server) -> Result<(), ServerError> {
        let registry = ToolRegistry::kibela(server.strict_argument_validation)?;
        info!(
            tools = registry.len(),
            strict_argument_validation = server.strict_argument_validation,
            "Registered Kibela tools"
        );

        let running = Running {
            dispatcher: Dispatcher::new(Arc::new(registry), server.client),
            server_info: server.server_info,
        };

        Starting {
            config: Config {
                transport: server.transport,
                cors: server.cors,
            },
            running,
        }
        .start()
        .await
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub(super) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down Kibela MCP Server");
}
