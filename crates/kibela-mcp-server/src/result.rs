use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::error;

use crate::errors::ToolError;

/// Render the outcome of a tool call as a tool result.
///
/// Failures become an error-flagged result with a single `Error: ...` text
/// block so that they never surface as protocol errors.
pub(crate) fn into_call_tool_result(tool: &str, outcome: Result<Value, ToolError>) -> CallToolResult {
    let rendered = outcome.and_then(|value| {
        serde_json::to_string_pretty(&value).map_err(ToolError::Serialization)
    });

    match rendered {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            error!(tool, error = %e, "Tool call failed");
            CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
        }
    }
}
