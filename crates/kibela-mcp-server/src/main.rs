use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use kibela_client::KibelaClient;
use kibela_mcp_server::server::Server;
use runtime::Config;
use tracing::info;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, Parser)]
#[command(
    version,
    styles = STYLES,
    about = "Kibela MCP Server - read and react to Kibela notes from an AI agent",
)]
struct Args {
    /// Path to the config file. Without one, configuration is read from
    /// KIBELA_TEAM, KIBELA_TOKEN and KIBELA_MCP_* environment variables.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: Config = match Args::parse().config {
        Some(path) => runtime::read_config(path)?,
        None => runtime::read_config_from_env()?,
    };

    // Held until exit so buffered file logs are flushed
    let _guard = config.logging.setup()?;

    info!(
        "Kibela MCP Server v{} // (c) Kibela MCP Server contributors // Licensed under MIT",
        env!("CARGO_PKG_VERSION")
    );

    let client_config = config.kibela.client_config()?;
    let client = KibelaClient::new(&client_config)?;
    info!(endpoint = %client.endpoint(), "Forwarding tool calls to Kibela");

    Ok(Server::builder()
        .transport(config.transport)
        .client(Arc::new(client))
        .strict_argument_validation(config.overrides.strict_argument_validation)
        .cors(config.cors)
        .server_info(config.server_info)
        .build()
        .start()
        .await?)
}
