use kibela_mcp_server::{cors::CorsConfig, server::Transport, server_info::ServerInfoConfig};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{kibela::KibelaSettings, logging::Logging, overrides::Overrides};

/// Configuration for the MCP server
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Kibela team and access token
    pub kibela: KibelaSettings,

    /// CORS configuration for the streamable HTTP transport
    pub cors: CorsConfig,

    /// Server metadata advertised to clients
    pub server_info: ServerInfoConfig,

    /// Logging configuration
    pub logging: Logging,

    /// Overrides for server behaviour
    pub overrides: Overrides,

    /// The type of server transport to use
    pub transport: Transport,
}
