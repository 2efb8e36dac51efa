use std::sync::Arc;

use kibela_client::GraphQLClient;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;

use crate::errors::ToolError;
use crate::registry::ToolRegistry;
use crate::result::into_call_tool_result;

/// Routes tool calls to their Kibela operation
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    client: Arc<dyn GraphQLClient>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, client: Arc<dyn GraphQLClient>) -> Self {
        Self { registry, client }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.registry.tools()
    }

    /// Run the tool called `name`. Absent arguments are treated as an empty object.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<Value, ToolError> {
        let operation = self
            .registry
            .find(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let arguments = arguments.unwrap_or_default();
        operation.execute(self.client.as_ref(), &arguments).await
    }

    /// Run the tool called `name` and render the outcome as a tool result
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        into_call_tool_result(name, self.dispatch(name, arguments).await)
    }
}
