//! Helpers for turning tool arguments into GraphQL variables

use std::borrow::Cow;

use kibela_client::GraphQLRequest;
use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ToolError;

/// Decode the raw tool arguments into a handler's typed input
pub(crate) fn decode<T: DeserializeOwned>(arguments: &JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments.clone())).map_err(ToolError::InvalidArguments)
}

/// The page size for a `limit` argument, falling back to `default` when it
/// is absent or below one and never exceeding `max`.
pub(crate) fn page_limit(limit: Option<f64>, default: u32, max: u32) -> u32 {
    match limit.map(f64::trunc) {
        Some(limit) if limit >= 1.0 => (limit as u32).min(max),
        _ => default,
    }
}

/// The `path` variable for a note lookup.
///
/// Full note URLs are reduced to `/notes/<segment>`; anything else is used
/// as given.
pub(crate) fn note_path(raw: &str) -> Cow<'_, str> {
    if !raw.contains("kibe.la/notes/") {
        return Cow::Borrowed(raw);
    }

    let segment = raw
        .split("/notes/")
        .nth(1)
        .and_then(|rest| rest.split(['?', '#']).next())
        .unwrap_or_default();
    Cow::Owned(format!("/notes/{segment}"))
}

/// Variables of a GraphQL request. Absent values are left out entirely.
#[derive(Debug, Default)]
pub(crate) struct Variables(JsonObject);

impl Variables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub(crate) fn set_opt<T: Into<Value>>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    pub(crate) fn into_request(self, operation_name: &str, query: &str) -> GraphQLRequest {
        GraphQLRequest::new(operation_name, query).with_variables(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    #[rstest]
    #[case("https://acme.kibe.la/notes/5154", "/notes/5154")]
    #[case("https://acme.kibe.la/notes/5154?comment=1", "/notes/5154")]
    #[case("https://acme.kibe.la/notes/5154#heading", "/notes/5154")]
    #[case("acme.kibe.la/notes/42/notes/7", "/notes/42")]
    #[case("/notes/5154", "/notes/5154")]
    #[case("5154", "5154")]
    #[case("https://example.com/notes/5154", "https://example.com/notes/5154")]
    fn derives_note_paths(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(note_path(raw), expected);
    }

    #[rstest]
    #[case(None, 15)]
    #[case(Some(0.0), 15)]
    #[case(Some(-3.0), 15)]
    #[case(Some(0.5), 15)]
    #[case(Some(5.0), 5)]
    #[case(Some(7.9), 7)]
    #[case(Some(50.0), 50)]
    #[case(Some(500.0), 50)]
    fn clamps_page_limits(#[case] limit: Option<f64>, #[case] expected: u32) {
        assert_eq!(page_limit(limit, 15, 50), expected);
    }

    #[test]
    fn absent_variables_are_left_out() {
        let request = Variables::new()
            .set("groupId", "g-1")
            .set_opt("parentFolderId", None::<String>)
            .into_request("GetGroupFolders", "query GetGroupFolders { __typename }");

        assert_eq!(Value::Object(request.variables), json!({ "groupId": "g-1" }));
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Input {
        id: String,
    }

    #[test]
    fn type_mismatches_are_invalid_arguments() {
        let arguments = json!({ "id": 42 }).as_object().cloned().unwrap_or_default();

        let error = decode::<Input>(&arguments).unwrap_err();

        assert!(matches!(error, ToolError::InvalidArguments(_)));
        assert!(error.to_string().starts_with("Invalid arguments:"));
    }
}
