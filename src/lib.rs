//! # mcp-intent - Natural-Language Tool Call Resolution
//!
//! Turns free-form user text into a structured MCP tool invocation against a
//! catalog discovered from a tool server:
//! - Tool catalog built once per session from `tools/list`
//! - Domain intercepts for recognised request categories (weather)
//! - Assisted resolution through a chat-completion service, with a bounded
//!   timeout and two-stage reply validation
//! - Deterministic keyword fallback with positional, type-coerced arguments
//! - MCP stdio transport and an interactive read loop
//!
//! ## Architecture
//!
//! ```text
//!                    ┌──────────────────────────────────────┐
//!   user text    →   │              Dispatcher              │
//!                    │  ┌──────────┐ ┌────────┐ ┌────────┐  │
//!                    │  │Intercepts│→│Assisted│→│Keywords│  │
//!                    │  └──────────┘ └────────┘ └────────┘  │
//!                    └──────────────────┬───────────────────┘
//!                                       ▼
//!                    ┌──────────────────────────────────────┐
//!                    │  Session: ToolCatalog + ToolTransport│
//!                    └──────────────────────────────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod repl;
pub mod resolve;
pub mod tools;
pub mod transport;
pub mod types;

// Internal utilities
pub mod observability;

pub use resolve::{Dispatcher, ResolutionOutcome, Session, ToolInvocation, TurnReport};
pub use tools::{ToolCatalog, ToolDescriptor};
pub use types::{Config, Error, Result};
