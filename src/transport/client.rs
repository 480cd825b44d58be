//! MCP client wrapper.
//!
//! Wraps rmcp's `RunningService` so the resolution pipeline can discover and
//! invoke tools through [`ToolTransport`].

use crate::tools::ToolDescriptor;
use crate::transport::{ToolOutput, ToolTransport};
use crate::types::{Error, Result, ServerConfig};
use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent, Tool as McpTool};
use rmcp::service::{RoleClient, RunningService, ServiceError, ServiceExt};
use rmcp::transport::{ConfigureCommandExt, IntoTransport, TokioChildProcess};
use rmcp::ClientHandler;
use serde_json::{Map, Value};
use tokio::process::Command;

/// Client handler that ignores server requests and notifications; we only
/// discover and call tools.
#[derive(Debug, Clone, Copy, Default)]
struct QuietClientHandler;

impl ClientHandler for QuietClientHandler {}

/// Initialized MCP session with the tool server.
pub struct McpClient {
    service: RunningService<RoleClient, QuietClientHandler>,
}

impl McpClient {
    /// Launch the tool server as a child process and complete the handshake.
    pub async fn spawn(config: &ServerConfig) -> Result<Self> {
        let args = config.args.clone();
        let transport = TokioChildProcess::new(Command::new(&config.command).configure(
            move |cmd| {
                cmd.args(&args);
            },
        ))
        .map_err(|e| Error::discovery(format!("failed to launch '{}': {}", config.command, e)))?;

        tracing::info!(
            "tool_server_spawned: command={} args={:?}",
            config.command,
            config.args
        );
        Self::connect(transport).await
    }

    /// Run the handshake over an already-open transport.
    pub async fn connect<T, E, A>(transport: T) -> Result<Self>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let service = QuietClientHandler
            .serve(transport)
            .await
            .map_err(|e| Error::discovery(format!("handshake failed: {}", e)))?;

        tracing::debug!("mcp_initialized");

        Ok(Self { service })
    }
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient").finish_non_exhaustive()
    }
}

fn descriptor_from_tool(tool: McpTool) -> ToolDescriptor {
    let schema = Value::Object(tool.input_schema.as_ref().clone());
    ToolDescriptor::from_input_schema(
        tool.name.to_string(),
        tool.description.map(|d| d.to_string()),
        &schema,
    )
}

/// Text blocks verbatim, other content as a placeholder, one per line.
fn render_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .map(|content| match &content.raw {
            RawContent::Text(text) => text.text.clone(),
            _ => "[non-text content]".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ToolTransport for McpClient {
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|e| Error::discovery(format!("tools/list failed: {}", e)))?;

        tracing::info!("tools_discovered: count={}", tools.len());
        Ok(tools.into_iter().map(descriptor_from_tool).collect())
    }

    async fn call_tool(&mut self, name: &str, args: Map<String, Value>) -> Result<ToolOutput> {
        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(args),
            })
            .await
            .map_err(|e| match e {
                ServiceError::McpError(data) => {
                    Error::tool_call(format!("{}: {}", name, data.message))
                }
                other => Error::transport(format!("{}: {}", name, other)),
            })?;

        let text = render_text(&result);
        if result.is_error.unwrap_or(false) {
            return Err(Error::tool_call(format!("{}: {}", name, text)));
        }
        Ok(ToolOutput {
            text,
            structured: result.structured_content,
        })
    }
}
