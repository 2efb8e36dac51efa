//! Cross Origin Resource Sharing for the streamable HTTP transport

use std::time::Duration;

use http::request::Parts;
use http::{HeaderName, HeaderValue, Method};
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::errors::ServerError;

/// CORS configuration
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Enable CORS handling
    pub enabled: bool,

    /// Origins allowed to call the server
    pub origins: Vec<String>,

    /// Regular expressions matched against the request origin
    pub match_origins: Vec<String>,

    /// Allow any origin. Cannot be combined with `allow_credentials`.
    pub allow_any_origin: bool,

    /// Add `Access-Control-Allow-Credentials: true`
    pub allow_credentials: bool,

    /// Allowed request methods
    pub allow_methods: Vec<String>,

    /// Allowed request headers
    pub allow_headers: Vec<String>,

    /// Response headers readable by browser scripts
    pub expose_headers: Vec<String>,

    /// Value of `Access-Control-Max-Age`, in seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: Vec::new(),
            match_origins: Vec::new(),
            allow_any_origin: true,
            allow_credentials: false,
            allow_methods: vec!["GET".into(), "POST".into(), "DELETE".into()],
            allow_headers: vec![
                "content-type".into(),
                "mcp-protocol-version".into(),
                "mcp-session-id".into(),
                "last-event-id".into(),
            ],
            expose_headers: vec!["mcp-session-id".into()],
            max_age: Some(7200),
        }
    }
}

impl CorsConfig {
    pub fn build_cors_layer(&self) -> Result<CorsLayer, ServerError> {
        self.validate()?;

        let methods = self
            .allow_methods
            .iter()
            .map(|method| {
                method
                    .parse::<Method>()
                    .map_err(|_| ServerError::Cors(format!("invalid method '{method}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut layer = CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(header_names(&self.allow_headers)?)
            .expose_headers(header_names(&self.expose_headers)?)
            .allow_credentials(self.allow_credentials);

        if let Some(max_age) = self.max_age {
            layer = layer.max_age(Duration::from_secs(max_age));
        }

        Ok(layer.allow_origin(self.allow_origin()?))
    }

    fn allow_origin(&self) -> Result<AllowOrigin, ServerError> {
        if self.allow_any_origin {
            return Ok(AllowOrigin::from(Any));
        }

        let regexes = self
            .match_origins
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    ServerError::Cors(format!("invalid origin pattern '{pattern}': {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if regexes.is_empty() {
            let origins = self
                .origins
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .map_err(|_| ServerError::Cors(format!("invalid origin '{origin}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(AllowOrigin::list(origins));
        }

        let origins = self.origins.clone();
        Ok(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin.to_str().is_ok_and(|origin| {
                    origins.iter().any(|allowed| allowed == origin)
                        || regexes.iter().any(|regex| regex.is_match(origin))
                })
            },
        ))
    }

    /// Reject combinations that `tower-http` would panic on
    fn validate(&self) -> Result<(), ServerError> {
        if self.origins.iter().any(|origin| origin == "*") {
            return Err(ServerError::Cors(
                "use `allow_any_origin: true` to allow every origin".to_string(),
            ));
        }
        if self.allow_credentials {
            if self.allow_any_origin {
                return Err(ServerError::Cors(
                    "`allow_credentials` cannot be combined with `allow_any_origin`".to_string(),
                ));
            }
            if self.allow_headers.iter().any(|header| header == "*")
                || self.allow_methods.iter().any(|method| method == "*")
                || self.expose_headers.iter().any(|header| header == "*")
            {
                return Err(ServerError::Cors(
                    "`allow_credentials` cannot be combined with wildcard headers or methods"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn header_names(names: &[String]) -> Result<Vec<HeaderName>, ServerError> {
    names
        .iter()
        .map(|name| {
            name.parse::<HeaderName>()
                .map_err(|_| ServerError::Cors(format!("invalid header name '{name}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let config = CorsConfig::default();

        assert!(config.enabled);
        assert!(config.allow_any_origin);
        assert_eq!(config.max_age, Some(7200));
        assert!(config.build_cors_layer().is_ok());
    }

    #[test]
    fn explicit_origins_and_patterns() {
        let config = CorsConfig {
            allow_any_origin: false,
            origins: vec!["https://acme.kibe.la".into()],
            match_origins: vec![r"^https://.*\.example\.com$".into()],
            ..Default::default()
        };

        assert!(config.build_cors_layer().is_ok());
    }

    #[test]
    fn wildcard_origin_is_rejected() {
        let config = CorsConfig {
            allow_any_origin: false,
            origins: vec!["*".into()],
            ..Default::default()
        };

        let error = config.build_cors_layer().unwrap_err();

        assert!(error.to_string().contains("allow_any_origin"));
    }

    #[test]
    fn credentials_with_any_origin_are_rejected() {
        let config = CorsConfig {
            allow_credentials: true,
            ..Default::default()
        };

        assert!(matches!(
            config.build_cors_layer(),
            Err(ServerError::Cors(_))
        ));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let config = CorsConfig {
            allow_any_origin: false,
            match_origins: vec!["(".into()],
            ..Default::default()
        };

        assert!(config.build_cors_layer().is_err());
    }

    #[test]
    fn invalid_methods_are_rejected() {
        let config = CorsConfig {
            allow_methods: vec!["NOT A METHOD".into()],
            ..Default::default()
        };

        assert!(config.build_cors_layer().is_err());
    }
}
