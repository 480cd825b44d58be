//! Dispatcher: runs the strategies in order and drives one turn.
//!
//! Session state (transport + catalog) is passed in explicitly; the
//! dispatcher itself holds only the strategies.

use crate::resolve::assisted::AssistedResolver;
use crate::resolve::intercept::{Intercept, WeatherIntercept};
use crate::resolve::keywords::resolve_keywords;
use crate::resolve::{ResolutionOutcome, Strategy, ToolInvocation};
use crate::tools::ToolCatalog;
use crate::transport::{ToolOutput, ToolTransport};
use crate::types::{Config, Error, Result, SessionId};

/// Shown when no strategy understood the input.
pub const NOT_UNDERSTOOD_MESSAGE: &str = "Sorry, I couldn't understand that. Please try again.";

// =============================================================================
// Session
// =============================================================================

/// An open transport plus the catalog discovered over it.
pub struct Session {
    id: SessionId,
    catalog: ToolCatalog,
    transport: Box<dyn ToolTransport>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("tools", &self.catalog.names())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Discover the catalog over `transport`. Any failure is fatal.
    pub async fn connect(mut transport: Box<dyn ToolTransport>) -> Result<Self> {
        let catalog = discover(transport.as_mut()).await?;
        let id = SessionId::new();
        tracing::info!("session_started: id={} tools={}", id, catalog.len());
        Ok(Self {
            id,
            catalog,
            transport,
        })
    }

    /// Rebuild the catalog wholesale from a fresh discovery.
    pub async fn refresh(&mut self) -> Result<()> {
        self.catalog = discover(self.transport.as_mut()).await?;
        tracing::info!("catalog_refreshed: id={} tools={}", self.id, self.catalog.len());
        Ok(())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Call the tool unchanged; its errors pass through untouched.
    pub async fn invoke(&mut self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.transport
            .call_tool(&invocation.tool_name, invocation.args.clone())
            .await
    }
}

async fn discover(transport: &mut dyn ToolTransport) -> Result<ToolCatalog> {
    let descriptors = transport.list_tools().await.map_err(as_discovery)?;
    ToolCatalog::from_descriptors(descriptors).map_err(as_discovery)
}

fn as_discovery(err: Error) -> Error {
    match err {
        Error::Discovery(_) => err,
        other => Error::discovery(other.to_string()),
    }
}

// =============================================================================
// Turn report
// =============================================================================

/// What one turn of the loop produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnReport {
    Completed {
        invocation: ToolInvocation,
        strategy: Strategy,
        output: ToolOutput,
    },
    NotUnderstood,
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Ordered strategy chain: intercepts, assisted, keywords.
#[derive(Debug, Default)]
pub struct Dispatcher {
    intercepts: Vec<Box<dyn Intercept>>,
    assisted: Option<AssistedResolver>,
}

impl Dispatcher {
    pub fn new(intercepts: Vec<Box<dyn Intercept>>, assisted: Option<AssistedResolver>) -> Self {
        Self {
            intercepts,
            assisted,
        }
    }

    /// Weather intercept plus the configured assistant (if enabled).
    pub fn from_config(config: &Config) -> Result<Self> {
        let intercepts: Vec<Box<dyn Intercept>> = vec![Box::new(WeatherIntercept::new(
            config.intercepts.default_location.clone(),
        ))];
        let assisted = if config.assistant.enabled {
            Some(AssistedResolver::from_config(&config.assistant)?)
        } else {
            None
        };
        Ok(Self::new(intercepts, assisted))
    }

    /// Resolve `text`; `Unresolved` only when every strategy declined.
    pub async fn resolve(&self, text: &str, catalog: &ToolCatalog) -> ResolutionOutcome {
        match self.resolve_with_strategy(text, catalog).await {
            Some((invocation, _)) => ResolutionOutcome::Resolved(invocation),
            None => ResolutionOutcome::Unresolved,
        }
    }

    /// Like [`resolve`](Self::resolve), also naming the strategy that won.
    pub async fn resolve_with_strategy(
        &self,
        text: &str,
        catalog: &ToolCatalog,
    ) -> Option<(ToolInvocation, Strategy)> {
        for intercept in &self.intercepts {
            if let Some(invocation) = intercept.intercept(text) {
                tracing::debug!(
                    "intercepted: rule={} tool={}",
                    intercept.name(),
                    invocation.tool_name
                );
                return Some((invocation, Strategy::Intercept));
            }
        }

        if let Some(assisted) = &self.assisted {
            if let ResolutionOutcome::Resolved(invocation) = assisted.resolve(text, catalog).await {
                return Some((invocation, Strategy::Assisted));
            }
            tracing::info!("falling_back_to_keywords");
        }

        match resolve_keywords(text, catalog) {
            ResolutionOutcome::Resolved(invocation) => Some((invocation, Strategy::Keyword)),
            ResolutionOutcome::Unresolved => {
                let exhausted = Error::ResolutionExhausted(text.to_string());
                tracing::info!(kind = exhausted.kind(), "{}", exhausted);
                None
            }
        }
    }

    /// Resolve and invoke. Tool errors are returned as-is.
    pub async fn run_turn(&self, text: &str, session: &mut Session) -> Result<TurnReport> {
        let Some((invocation, strategy)) = self.resolve_with_strategy(text, session.catalog()).await
        else {
            return Ok(TurnReport::NotUnderstood);
        };

        tracing::info!(strategy = strategy.as_str(), "calling_tool: {}", invocation);
        let output = session.invoke(&invocation).await?;
        Ok(TurnReport::Completed {
            invocation,
            strategy,
            output,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
