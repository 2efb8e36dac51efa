use schemars::JsonSchema;
use serde::Deserialize;

const DEFAULT_NAME: &str = "Kibela MCP Server";

/// Server metadata advertised during initialization
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerInfoConfig {
    /// The name of the MCP server implementation
    pub name: Option<String>,

    /// The version of the MCP server implementation
    pub version: Option<String>,

    /// Human-readable title for the server
    pub title: Option<String>,

    /// URL to the server's website or documentation
    pub website_url: Option<String>,
}

impl ServerInfoConfig {
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string())
    }

    pub fn version(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    pub fn title(&self) -> Option<String> {
        self.title.clone().or_else(|| Some(DEFAULT_NAME.to_string()))
    }

    pub fn website_url(&self) -> Option<String> {
        self.website_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let info = ServerInfoConfig::default();

        assert_eq!(info.name(), "Kibela MCP Server");
        assert_eq!(info.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(info.title().as_deref(), Some("Kibela MCP Server"));
        assert_eq!(info.website_url(), None);
    }

    #[test]
    fn overrides() {
        let info: ServerInfoConfig = serde_yaml::from_str(
            "name: Acme Knowledge Base\nwebsite_url: https://acme.kibe.la",
        )
        .unwrap();

        assert_eq!(info.name(), "Acme Knowledge Base");
        assert_eq!(info.website_url().as_deref(), Some("https://acme.kibe.la"));
    }
}
