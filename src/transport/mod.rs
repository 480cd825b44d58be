//! Tool transport: discovery and invocation against the tool server.
//!
//! The resolution pipeline only sees [`ToolTransport`]; the shipped
//! implementation is [`McpClient`], an rmcp client over the server's stdio.

pub mod client;

pub use client::McpClient;

use crate::tools::ToolDescriptor;
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// What a tool call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Human-readable rendering of the result content.
    pub text: String,
    /// Structured result, when the server sent one.
    pub structured: Option<Value>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
        }
    }
}

/// Discovery and invocation collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolTransport: Send {
    /// Fetch every tool the server offers, in server order.
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>>;

    /// Invoke `name` with `args` unchanged. Failures are the callee's to report.
    async fn call_tool(&mut self, name: &str, args: Map<String, Value>) -> Result<ToolOutput>;
}
