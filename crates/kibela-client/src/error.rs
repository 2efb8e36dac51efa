use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid Kibela endpoint: {0}")]
    Endpoint(url::ParseError),

    #[error("invalid Kibela team name {0:?}: expected letters, digits and hyphens")]
    InvalidTeam(String),

    #[error(transparent)]
    HeaderValue(InvalidHeaderValue),

    #[error("request to Kibela failed: {0}")]
    Request(reqwest::Error),

    #[error("Kibela responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("GraphQL error: {}", join_messages(.0))]
    GraphQL(Vec<GraphQLError>),

    #[error("could not decode Kibela response: {0}")]
    Decode(serde_json::Error),

    #[error("Kibela response did not contain any data")]
    MissingData,
}

/// A single entry of the `errors` array of a GraphQL response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_display_every_message() {
        let error = ClientError::GraphQL(vec![
            GraphQLError::new("Note not found"),
            GraphQLError::new("Permission denied"),
        ]);

        assert_eq!(
            error.to_string(),
            "GraphQL error: Note not found; Permission denied"
        );
    }

    #[test]
    fn status_errors_include_the_body() {
        let error = ClientError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid token".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Kibela responded with status 401 Unauthorized: invalid token"
        );
    }

    #[test]
    fn graphql_error_keeps_path_and_extensions() {
        let error: GraphQLError = serde_json::from_value(serde_json::json!({
            "message": "Not found",
            "path": ["note"],
            "extensions": { "code": "NOT_FOUND" }
        }))
        .unwrap();

        assert_eq!(error.message, "Not found");
        assert_eq!(error.path, Some(vec![Value::from("note")]));
        assert_eq!(error.extensions, Some(serde_json::json!({ "code": "NOT_FOUND" })));
    }
}
