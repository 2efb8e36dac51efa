use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::error::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a single Kibela team.
#[derive(Clone, Debug)]
pub struct KibelaConfig {
    /// The team name, i.e. the subdomain in `<team>.kibe.la`
    pub team: String,

    /// Personal access token, sent as a bearer token
    pub token: SecretString,

    /// The GraphQL endpoint of the team
    pub endpoint: Url,

    /// The HTTP client timeout for each request
    pub timeout: Duration,
}

impl KibelaConfig {
    /// Create a config for `team`, pointing at `https://<team>.kibe.la/api/v1`.
    pub fn new(team: impl Into<String>, token: SecretString) -> Result<Self, ClientError> {
        let team = team.into();
        let endpoint = Self::team_endpoint(&team)?;
        Ok(Self {
            team,
            token,
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// The GraphQL endpoint for a team name.
    ///
    /// The team must be a single DNS label so that the token is only ever
    /// sent to a `kibe.la` host.
    pub fn team_endpoint(team: &str) -> Result<Url, ClientError> {
        if !is_dns_label(team) {
            return Err(ClientError::InvalidTeam(team.to_string()));
        }
        Url::parse(&format!("https://{team}.kibe.la/api/v1")).map_err(ClientError::Endpoint)
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Mock configuration for use in tests.
    /// Pair it with a wiremock or mockito server URL.
    pub fn for_tests(endpoint: Url) -> Self {
        Self {
            team: "acme".to_string(),
            token: SecretString::from("test-token"),
            endpoint,
            timeout: Duration::from_secs(5),
        }
    }
}

fn is_dns_label(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
