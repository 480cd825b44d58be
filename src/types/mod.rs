//! Core types for the interpreter.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (SessionId, TurnId)
//! - **Errors**: Application error taxonomy with thiserror derives
//! - **Config**: Configuration for the assistant, tool server, and intercepts

mod config;
mod errors;
mod ids;

pub use config::{AssistantConfig, Config, InterceptConfig, ObservabilityConfig, ServerConfig};
pub use errors::{Error, Result};
pub use ids::{SessionId, TurnId};
