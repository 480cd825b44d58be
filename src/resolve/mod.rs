//! Resolution pipeline: free-form text to a `(tool, args)` invocation.
//!
//! Strategies run in a fixed order, each one a fallback for the previous:
//! ```text
//!   text ──► intercepts ──► assisted ──► keywords ──► not understood
//!               │             │            │
//!               └─────────────┴────────────┴──► ToolInvocation
//! ```
//! Intercepts short-circuit. The assisted step needs a network round trip and
//! may fail in several ways; every failure degrades to the keyword step in
//! the same turn.

pub mod assisted;
pub mod dispatcher;
pub mod intercept;
pub mod keywords;
pub mod prompt;

pub use assisted::{AssistedResolver, CompletionBackend, OllamaBackend, ParseCandidate};
pub use dispatcher::{Dispatcher, Session, TurnReport, NOT_UNDERSTOOD_MESSAGE};
pub use intercept::{Intercept, WeatherIntercept};
pub use keywords::resolve_keywords;
pub use prompt::build_instructions;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A tool name plus its argument mapping, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub args: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            args,
        }
    }
}

impl fmt::Display for ToolInvocation {
    /// Renders as `name(k=v, ...)`, strings unquoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect();
        write!(f, "{}({})", self.tool_name, args.join(", "))
    }
}

/// Result of one resolution strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved(ToolInvocation),
    Unresolved,
}

impl ResolutionOutcome {
    pub fn resolved(tool_name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self::Resolved(ToolInvocation::new(tool_name, args))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn into_invocation(self) -> Option<ToolInvocation> {
        match self {
            Self::Resolved(invocation) => Some(invocation),
            Self::Unresolved => None,
        }
    }
}

/// Which step of the pipeline produced an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Intercept,
    Assisted,
    Keyword,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Intercept => "intercept",
            Strategy::Assisted => "assisted",
            Strategy::Keyword => "keyword",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
