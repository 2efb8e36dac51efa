use bon::bon;
use kibela_client::{GraphQLClient, GraphQLRequest};
use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::ToolError;

/// Builds the GraphQL request for a tool call from its raw arguments
pub type RequestBuilder = fn(&JsonObject) -> Result<GraphQLRequest, ToolError>;

/// Turns the `data` member of a GraphQL response into the tool's result value
pub type Reshaper = fn(Value) -> Result<Value, ToolError>;

/// How required arguments are checked before a request is sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Absent, null or blank required arguments are rejected
    Strict,

    /// Arguments are forwarded as given and Kibela reports any problem
    #[default]
    Lenient,
}

/// A tool backed by a single Kibela GraphQL operation
#[derive(Clone)]
pub struct Operation {
    tool: Tool,
    validation: Validation,
    request: RequestBuilder,
    reshape: Reshaper,
}

#[bon]
impl Operation {
    #[builder]
    pub fn new(
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        #[builder(default)] validation: Validation,
        request: RequestBuilder,
        reshape: Reshaper,
    ) -> Self {
        let input_schema = match input_schema {
            Value::Object(schema) => schema,
            _ => JsonObject::new(),
        };
        Self {
            tool: Tool::new(name, description, input_schema),
            validation,
            request,
            reshape,
        }
    }
}

impl Operation {
    pub fn name(&self) -> &str {
        &self.tool.name
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Names listed in the `required` array of the input schema
    pub fn required_arguments(&self) -> impl Iterator<Item = &str> {
        self.tool
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// The `properties` object of the input schema
    pub fn properties(&self) -> Option<&JsonObject> {
        self.tool
            .input_schema
            .get("properties")
            .and_then(Value::as_object)
    }

    pub fn validate(&self, arguments: &JsonObject) -> Result<(), ToolError> {
        if self.validation == Validation::Lenient {
            return Ok(());
        }

        for name in self.required_arguments() {
            let present = match arguments.get(name) {
                None | Some(Value::Null) => false,
                Some(Value::String(value)) => !value.trim().is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(ToolError::MissingArgument(name.to_string()));
            }
        }
        Ok(())
    }

    pub fn build_request(&self, arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
        self.validate(arguments)?;
        (self.request)(arguments)
    }

    #[tracing::instrument(skip_all, fields(tool = %self.tool.name))]
    pub async fn execute(
        &self,
        client: &dyn GraphQLClient,
        arguments: &JsonObject,
    ) -> Result<Value, ToolError> {
        let request = self.build_request(arguments)?;
        let variables = Value::Object(request.variables.clone());
        debug!(%variables, "Executing Kibela operation");
        let data = client.execute(&request).await?;
        (self.reshape)(data)
    }
}

/// Deserialize the `data` member of a response into the shape a handler selected
pub(crate) fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T, ToolError> {
    serde_json::from_value(data).map_err(ToolError::UnexpectedResponse)
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(ToolError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubClient;
    use rstest::rstest;
    use serde_json::json;

    fn echo_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
        Ok(GraphQLRequest::new("Echo", "query Echo($id: ID) { echo(id: $id) }")
            .with_variables(arguments.clone()))
    }

    fn echo_reshape(data: Value) -> Result<Value, ToolError> {
        Ok(data.get("echo").cloned().unwrap_or(Value::Null))
    }

    fn echo(validation: Validation) -> Operation {
        Operation::builder()
            .name("echo")
            .description("Echo an id")
            .input_schema(json!({
                "type": "object",
                "properties": { "id": { "type": "string" }, "note": { "type": "string" } },
                "required": ["id"]
            }))
            .validation(validation)
            .request(echo_request)
            .reshape(echo_reshape)
            .build()
    }

    fn arguments(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn reads_required_arguments_from_the_schema() {
        let operation = echo(Validation::Strict);

        assert_eq!(operation.required_arguments().collect::<Vec<_>>(), ["id"]);
        assert_eq!(operation.properties().map(JsonObject::len), Some(2));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "id": null }))]
    #[case(json!({ "id": "" }))]
    #[case(json!({ "id": "   " }))]
    fn strict_validation_rejects_missing_arguments(#[case] input: Value) {
        let error = echo(Validation::Strict)
            .validate(&arguments(input))
            .unwrap_err();

        assert_eq!(error.to_string(), "id is required");
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "id": null }))]
    #[case(json!({ "id": "" }))]
    fn lenient_validation_forwards_anything(#[case] input: Value) {
        assert!(echo(Validation::Lenient).validate(&arguments(input)).is_ok());
    }

    #[test]
    fn validation_can_be_tightened() {
        let operation = echo(Validation::Lenient).with_validation(Validation::Strict);

        assert_eq!(operation.validation(), Validation::Strict);
        assert!(operation.validate(&JsonObject::new()).is_err());
    }

    #[tokio::test]
    async fn executes_through_the_client() {
        let client = StubClient::responding(json!({ "echo": "note-1" }));

        let result = echo(Validation::Strict)
            .execute(&client, &arguments(json!({ "id": "note-1" })))
            .await
            .unwrap();

        assert_eq!(result, json!("note-1"));
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests.first().and_then(|r| r.operation_name.as_deref()),
            Some("Echo")
        );
    }

    #[tokio::test]
    async fn does_not_send_invalid_calls() {
        let client = StubClient::responding(json!({}));

        let result = echo(Validation::Strict)
            .execute(&client, &JsonObject::new())
            .await;

        assert!(matches!(result, Err(ToolError::MissingArgument(_))));
        assert!(client.requests().is_empty());
    }
}
