use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};

use crate::dispatcher::Dispatcher;
use crate::errors::McpError;
use crate::server_info::ServerInfoConfig;

#[derive(Clone)]
pub(super) struct Running {
    pub(super) dispatcher: Dispatcher,
    pub(super) server_info: ServerInfoConfig,
}

impl Running {
    fn list_tools_impl(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.dispatcher.tools(),
            ..Default::default()
        }
    }
}

impl ServerHandler for Running {
    #[tracing::instrument(skip_all, fields(kibela.mcp.tool_name = request.name.as_ref(), kibela.mcp.request_id = %context.id.clone()))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatcher.call(&request.name, request.arguments).await)
    }

    #[tracing::instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(self.list_tools_impl())
    }

    fn get_info(&self) -> ServerInfo {
        let capabilities = ServerCapabilities {
            tools: Some(ToolsCapability { list_changed: None }),
            ..Default::default()
        };

        ServerInfo {
            server_info: Implementation {
                name: self.server_info.name(),
                icons: None,
                title: self.server_info.title(),
                version: self.server_info.version(),
                website_url: self.server_info.website_url(),
                ..Default::default()
            },
            capabilities,
            ..Default::default()
        }
    }
}
