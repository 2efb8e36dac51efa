use std::time::Duration;

use kibela_client::KibelaConfig;
use kibela_mcp_server::errors::ServerError;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

const KIBELA_TEAM_ENV: &str = "KIBELA_TEAM";
const KIBELA_TOKEN_ENV: &str = "KIBELA_TOKEN";

/// Kibela credentials and connection settings
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KibelaSettings {
    /// The team name, i.e. the subdomain of `<team>.kibe.la`
    pub team: Option<String>,

    /// A personal access token
    #[schemars(with = "Option<String>")]
    pub token: Option<SecretString>,

    /// Override the GraphQL endpoint derived from the team name
    pub endpoint: Option<Url>,

    /// Timeout for each request to Kibela
    #[serde(with = "humantime_serde")]
    #[schemars(with = "Option<String>")]
    pub timeout: Option<Duration>,
}

impl KibelaSettings {
    /// Build the client configuration, failing when the team or token is
    /// absent or blank
    pub fn client_config(&self) -> Result<KibelaConfig, ServerError> {
        let team = self
            .team
            .as_deref()
            .map(str::trim)
            .filter(|team| !team.is_empty())
            .ok_or_else(|| ServerError::EnvironmentVariable(KIBELA_TEAM_ENV.to_string()))?;
        let token = self
            .token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or_else(|| ServerError::EnvironmentVariable(KIBELA_TOKEN_ENV.to_string()))?;

        let mut config = KibelaConfig::new(team, token.clone())?;
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(team: Option<&str>, token: Option<&str>) -> KibelaSettings {
        KibelaSettings {
            team: team.map(str::to_string),
            token: token.map(SecretString::from),
            ..Default::default()
        }
    }

    #[test]
    fn builds_the_team_endpoint() {
        let config = settings(Some("acme"), Some("secret"))
            .client_config()
            .unwrap();

        assert_eq!(config.endpoint.as_str(), "https://acme.kibe.la/api/v1");
        assert_eq!(config.token.expose_secret(), "secret");
    }

    #[rstest]
    #[case(None, Some("secret"), "KIBELA_TEAM")]
    #[case(Some(""), Some("secret"), "KIBELA_TEAM")]
    #[case(Some("acme"), None, "KIBELA_TOKEN")]
    #[case(Some("acme"), Some("  "), "KIBELA_TOKEN")]
    fn missing_credentials_prevent_startup(
        #[case] team: Option<&str>,
        #[case] token: Option<&str>,
        #[case] variable: &str,
    ) {
        let error = settings(team, token).client_config().unwrap_err();

        assert_eq!(
            error.to_string(),
            format!("Missing environment variable: {variable}")
        );
    }

    #[test]
    fn endpoint_and_timeout_overrides() {
        let settings: KibelaSettings = serde_yaml::from_str(
            "team: acme\ntoken: secret\nendpoint: http://localhost:4000/api/v1\ntimeout: 5s",
        )
        .unwrap();

        let config = settings.client_config().unwrap();

        assert_eq!(config.endpoint.as_str(), "http://localhost:4000/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
