use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::config::KibelaConfig;
use crate::error::{ClientError, GraphQLError};

/// A GraphQL operation and its bound variables
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

impl GraphQLRequest {
    pub fn new(operation_name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: Some(operation_name.into()),
            variables: Map::new(),
        }
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }
}

/// Executes GraphQL operations against a remote endpoint.
///
/// Implementations send exactly one request per call and resolve to the
/// `data` member of the response. Errors reported by the server surface as
/// [`ClientError::GraphQL`].
pub trait GraphQLClient: Send + Sync {
    fn execute<'a>(&'a self, request: &'a GraphQLRequest)
    -> BoxFuture<'a, Result<Value, ClientError>>;
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    errors: Option<Vec<GraphQLError>>,
}

/// HTTP client for the Kibela GraphQL API
#[derive(Clone, Debug)]
pub struct KibelaClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl KibelaClient {
    pub fn new(config: &KibelaConfig) -> Result<Self, ClientError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.token.expose_secret()))
                .map_err(ClientError::HeaderValue)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("kibela-mcp-server/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: &GraphQLRequest) -> Result<Value, ClientError> {
        debug!(
            operation = request.operation_name.as_deref().unwrap_or("anonymous"),
            endpoint = %self.endpoint,
            "Sending GraphQL request to Kibela"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(ClientError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Request)?;

        match serde_json::from_str::<GraphQLResponse>(&body) {
            Ok(GraphQLResponse {
                errors: Some(errors),
                ..
            }) if !errors.is_empty() => Err(ClientError::GraphQL(errors)),
            Ok(_) if !status.is_success() => Err(ClientError::Status { status, body }),
            Ok(GraphQLResponse {
                data: Some(data), ..
            }) => Ok(data),
            Ok(_) => Err(ClientError::MissingData),
            Err(_) if !status.is_success() => Err(ClientError::Status { status, body }),
            Err(e) => Err(ClientError::Decode(e)),
        }
    }
}

impl GraphQLClient for KibelaClient {
    fn execute<'a>(
        &'a self,
        request: &'a GraphQLRequest,
    ) -> BoxFuture<'a, Result<Value, ClientError>> {
        self.send(request).boxed()
    }
}
