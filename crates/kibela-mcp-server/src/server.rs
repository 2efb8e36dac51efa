use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use bon::bon;
use kibela_client::GraphQLClient;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::cors::CorsConfig;
use crate::errors::ServerError;
use crate::server_info::ServerInfoConfig;

mod states;

use states::StateMachine;

/// A Kibela MCP Server
pub struct Server {
    transport: Transport,
    client: Arc<dyn GraphQLClient>,
    strict_argument_validation: bool,
    cors: CorsConfig,
    server_info: ServerInfoConfig,
}

#[derive(Debug, Clone, Deserialize, Default, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transport {
    /// Use standard IO for server <> client communication
    #[default]
    Stdio,

    /// Legacy two-endpoint SSE transport.
    ///
    /// Accepted in configuration so that it can be rejected with a clear
    /// message; use `streamable_http` instead.
    #[serde(rename = "sse")]
    SSE {
        /// The IP address to bind to
        #[serde(default = "Transport::default_address")]
        address: IpAddr,

        /// The port to bind to
        #[serde(default = "Transport::default_port")]
        port: u16,
    },

    /// Host the MCP server at `/mcp`, using streamable HTTP messages.
    StreamableHttp {
        /// The IP address to bind to
        #[serde(default = "Transport::default_address")]
        address: IpAddr,

        /// The port to bind to
        #[serde(default = "Transport::default_port")]
        port: u16,

        /// Enable stateful mode for session management
        #[serde(default = "Transport::default_stateful_mode")]
        stateful_mode: bool,
    },
}

impl Transport {
    fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_stateful_mode() -> bool {
        true
    }
}

#[bon]
impl Server {
    #[builder]
    pub fn new(
        transport: Transport,
        client: Arc<dyn GraphQLClient>,
        #[builder(default)] strict_argument_validation: bool,
        #[builder(default)] cors: CorsConfig,
        #[builder(default)] server_info: ServerInfoConfig,
    ) -> Self {
        Self {
            transport,
            client,
            strict_argument_validation,
            cors,
            server_info,
        }
    }

    /// Serve until the transport closes or the process is asked to stop
    pub async fn start(self) -> Result<(), ServerError> {
        StateMachine {}.start(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("type: stdio", "Stdio")]
    #[case("type: sse", "SSE { address: 127.0.0.1, port: 3000 }")]
    #[case(
        "type: streamable_http",
        "StreamableHttp { address: 127.0.0.1, port: 3000, stateful_mode: true }"
    )]
    #[case(
        "type: streamable_http\naddress: 0.0.0.0\nport: 8080\nstateful_mode: false",
        "StreamableHttp { address: 0.0.0.0, port: 8080, stateful_mode: false }"
    )]
    fn deserializes_transports(#[case] yaml: &str, #[case] expected: &str) {
        let transport: Transport = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(format!("{transport:?}"), expected);
    }

    #[test]
    fn stdio_is_the_default() {
        assert!(matches!(Transport::default(), Transport::Stdio));
    }
}
