use kibela_client::ClientError;
use tokio::task::JoinError;

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Missing environment variable: {0}")]
    EnvironmentVariable(String),

    #[error("Could not create Kibela client: {0}")]
    Client(#[from] ClientError),

    #[error("Invalid declaration for tool {tool}: {reason}")]
    ToolDeclaration { tool: String, reason: String },

    #[error("Could not bind listener: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start server: {0}")]
    StartupError(#[from] JoinError),

    #[error("Failed to initialize MCP server: {0}")]
    McpInitializeError(#[from] Box<rmcp::service::ServerInitializeError>),

    #[error("CORS configuration error: {0}")]
    Cors(String),

    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),
}

/// An error while running a single tool call.
///
/// These never escape the tool boundary; they are rendered into an
/// error-flagged tool result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0} is required")]
    MissingArgument(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(serde_json::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Unexpected response from Kibela: {0}")]
    UnexpectedResponse(serde_json::Error),

    #[error("Kibela returned no {0}")]
    MissingField(&'static str),

    #[error("Could not serialize result: {0}")]
    Serialization(serde_json::Error),
}

/// An MCP protocol error
pub type McpError = rmcp::model::ErrorData;
