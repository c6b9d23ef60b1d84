use std::future::Future;
use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
    JsonObject, ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ServerHandler, ServiceExt};
use serde_json::{json, Value};
use tracing::{error, info};
use typecast_core::client::TypecastClient;
use typecast_core::knowledge::INSTRUCTIONS;
use typecast_core::output::OutputWriter;
use typecast_core::playback::AudioPlayer;
use typecast_core::tools::ToolRegistry;
use typecast_core::{Settings, TypecastError};

/// MCP front end over the Typecast tool registry
#[derive(Clone)]
pub struct TypecastServer {
    registry: Arc<ToolRegistry>,
}

impl TypecastServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_settings(settings: &Settings) -> typecast_core::Result<Self> {
        let client = TypecastClient::new(settings)?;
        Ok(Self::new(ToolRegistry::standard(
            Arc::new(client),
            OutputWriter::new(&settings.output_dir),
            AudioPlayer::default(),
        )))
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.registry
            .definitions()
            .into_iter()
            .map(|def| {
                let schema = match def.input_schema {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                Tool::new(def.name, def.description, Arc::new(schema))
            })
            .collect()
    }

    /// Run one tool call. Problems with the caller's input become MCP errors;
    /// failures past validation become error results the model can read.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = Value::Object(arguments.unwrap_or_default());

        match self.registry.call(name, &arguments).await {
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(output.render())])),
            Err(e) if e.is_caller_error() => {
                let data = match &e {
                    TypecastError::Validation { field, .. } => Some(json!({ "field": field })),
                    _ => None,
                };
                Err(McpError::invalid_params(e.to_string(), data))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

impl ServerHandler for TypecastServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: self.tools(),
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.dispatch(&request.name, request.arguments).await }
    }
}

/// Serve the Typecast tools over stdio until the client disconnects.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let server = TypecastServer::from_settings(&settings)?;
    info!(
        api_host = %settings.api_host,
        output_dir = %settings.output_dir.display(),
        "Starting Typecast MCP server on stdio"
    );

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| error!(error = %e, "Failed to start MCP service"))?;
    let reason = service.waiting().await?;
    info!(?reason, "MCP service stopped");
    Ok(())
}
