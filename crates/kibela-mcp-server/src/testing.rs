use std::sync::Mutex;

use futures::FutureExt;
use futures::future::BoxFuture;
use kibela_client::{ClientError, GraphQLClient, GraphQLError, GraphQLRequest};
use serde_json::Value;

/// In-memory client that records every request and replays a fixed outcome
pub(crate) struct StubClient {
    outcome: Result<Value, String>,
    requests: Mutex<Vec<GraphQLRequest>>,
}

impl StubClient {
    pub(crate) fn responding(data: Value) -> Self {
        Self {
            outcome: Ok(data),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<GraphQLRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub(crate) fn last_request(&self) -> GraphQLRequest {
        self.requests()
            .pop()
            .unwrap_or_else(|| GraphQLRequest::new("None", ""))
    }
}

impl GraphQLClient for StubClient {
    fn execute<'a>(
        &'a self,
        request: &'a GraphQLRequest,
    ) -> BoxFuture<'a, Result<Value, ClientError>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let outcome = self
            .outcome
            .clone()
            .map_err(|message| ClientError::GraphQL(vec![GraphQLError::new(message)]));
        async move { outcome }.boxed()
    }
}
