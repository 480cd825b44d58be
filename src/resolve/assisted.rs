//! Assisted resolver: asks a chat-completion service to pick the tool.
//!
//! The reply is decoded in two stages: the transport envelope (the service's
//! chat response) and then the message payload inside it, which must be a
//! `{tool, args}` object. Each stage has its own error kind. The resolver does
//! no text analysis of its own and never raises: every failure becomes
//! [`ResolutionOutcome::Unresolved`] so the caller can fall back.

use crate::resolve::prompt::build_instructions;
use crate::resolve::{ResolutionOutcome, ToolInvocation};
use crate::tools::ToolCatalog;
use crate::types::{AssistantConfig, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

// =============================================================================
// Backend seam
// =============================================================================

/// A text-completion collaborator.
///
/// Returns the raw message payload; envelope decoding is the backend's job,
/// payload decoding is the resolver's.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, instructions: &str, user_text: &str) -> Result<String>;
}

// =============================================================================
// Ollama chat backend
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

/// Backend speaking the Ollama `/api/chat` protocol with JSON-mode output.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/api/chat", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn complete(&self, instructions: &str, user_text: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: instructions,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            stream: false,
            format: "json",
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::assisted_transport(format!("request to {} timed out", self.url))
                } else {
                    Error::assisted_transport(format!("request to {} failed: {}", self.url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::assisted_transport(format!(
                "{} answered with status {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::assisted_transport(format!("failed to read reply body: {}", e)))?;

        decode_envelope(&body)
    }
}

/// First stage: pull the message payload out of a chat envelope.
fn decode_envelope(body: &str) -> Result<String> {
    let envelope: ChatEnvelope = serde_json::from_str(body)
        .map_err(|e| Error::assisted_envelope(format!("reply is not a chat envelope: {}", e)))?;
    envelope
        .message
        .map(|m| m.content)
        .ok_or_else(|| Error::assisted_envelope("reply has no message"))
}

// =============================================================================
// Payload decoding
// =============================================================================

/// The collaborator's `{tool, args}` answer before catalog validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseCandidate {
    pub tool: String,
    pub args: Map<String, Value>,
}

/// Second stage: decode the message payload.
///
/// An absent `args` field means no arguments; any other non-object `args`
/// (including `null`) is rejected.
pub fn parse_candidate(payload: &str) -> Result<ParseCandidate> {
    if payload.trim().is_empty() {
        return Err(Error::assisted_parse("empty payload"));
    }

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::assisted_parse(format!("payload is not JSON: {}", e)))?;
    let Value::Object(mut object) = value else {
        return Err(Error::assisted_parse("payload is not an object"));
    };

    let tool = match object.remove("tool") {
        Some(Value::String(tool)) => tool,
        Some(_) => return Err(Error::assisted_parse("'tool' is not a string")),
        None => return Err(Error::assisted_parse("payload has no 'tool'")),
    };

    let args = match object.remove("args") {
        None => Map::new(),
        Some(Value::Object(args)) => args,
        Some(_) => return Err(Error::assisted_parse("'args' is not an object")),
    };

    Ok(ParseCandidate { tool, args })
}

// =============================================================================
// Resolver
// =============================================================================

/// Pass-through plus validation gate around a [`CompletionBackend`].
pub struct AssistedResolver {
    backend: Box<dyn CompletionBackend>,
    timeout: Duration,
}

impl std::fmt::Debug for AssistedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistedResolver")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AssistedResolver {
    pub fn new(backend: Box<dyn CompletionBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Build the shipped Ollama-backed resolver from configuration.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let backend = OllamaBackend::new(config)?;
        Ok(Self::new(Box::new(backend), config.timeout))
    }

    /// Resolve `text`; any failure is logged and reported as `Unresolved`.
    pub async fn resolve(&self, text: &str, catalog: &ToolCatalog) -> ResolutionOutcome {
        match self.try_resolve(text, catalog).await {
            Ok(invocation) => ResolutionOutcome::Resolved(invocation),
            Err(e) => {
                tracing::warn!(kind = e.kind(), "assisted_resolution_failed: {}", e);
                ResolutionOutcome::Unresolved
            }
        }
    }

    /// Same as [`resolve`](Self::resolve) but reports why it failed.
    pub async fn try_resolve(&self, text: &str, catalog: &ToolCatalog) -> Result<ToolInvocation> {
        let instructions = build_instructions(catalog);

        let payload = tokio::time::timeout(self.timeout, self.backend.complete(&instructions, text))
            .await
            .map_err(|_| {
                Error::assisted_transport(format!("no reply within {:?}", self.timeout))
            })??;

        let candidate = parse_candidate(&payload)?;
        if !catalog.contains(&candidate.tool) {
            return Err(Error::tool_not_found(candidate.tool));
        }

        tracing::debug!("assisted_candidate_accepted: tool={}", candidate.tool);
        Ok(ToolInvocation::new(candidate.tool, candidate.args))
    }
}

// =============================================================================
// Tests
// =============================================================================
