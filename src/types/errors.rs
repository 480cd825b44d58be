//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Only [`Error::Discovery`] is fatal to a
//! session; every resolution-time error degrades to the next strategy.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the interpreter.
#[derive(Error, Debug)]
pub enum Error {
    /// No catalog could be built at session start (fatal).
    #[error("tool discovery failed: {0}")]
    Discovery(String),

    /// The assistant could not be reached, timed out, or answered with a
    /// non-success status.
    #[error("assistant transport failure: {0}")]
    AssistedTransport(String),

    /// The assistant reply is not a chat envelope with a message payload.
    #[error("assistant envelope malformed: {0}")]
    AssistedEnvelope(String),

    /// The message payload inside the envelope is not a `{tool, args}` object.
    #[error("assistant payload unusable: {0}")]
    AssistedParse(String),

    /// Named tool is absent from the catalog.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Fewer numerals in the text than the tool has required parameters.
    #[error("tool '{tool}' needs {required} argument(s), found {found}")]
    InsufficientArguments {
        tool: String,
        required: usize,
        found: usize,
    },

    /// A bound numeral could not be converted to the declared type.
    #[error("cannot coerce '{value}' for parameter '{param}': {reason}")]
    Coercion {
        param: String,
        value: String,
        reason: String,
    },

    /// Every strategy declined the input.
    #[error("could not resolve input: {0}")]
    ResolutionExhausted(String),

    /// The remote tool call failed.
    #[error("tool call failed: {0}")]
    ToolCall(String),

    /// The tool transport broke mid-session.
    #[error("transport error: {0}")]
    Transport(String),

    /// Validation errors.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Discovery(_) => "discovery",
            Error::AssistedTransport(_) => "assisted_transport",
            Error::AssistedEnvelope(_) => "assisted_envelope",
            Error::AssistedParse(_) => "assisted_parse",
            Error::ToolNotFound(_) => "tool_not_found",
            Error::InsufficientArguments { .. } => "insufficient_arguments",
            Error::Coercion { .. } => "coercion",
            Error::ResolutionExhausted(_) => "resolution_exhausted",
            Error::ToolCall(_) => "tool_call",
            Error::Transport(_) => "transport",
            Error::Validation(_) => "validation",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }

    /// Whether the session must end when this error surfaces.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Discovery(_))
    }
}

// Convenience constructors
impl Error {
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    pub fn assisted_transport(msg: impl Into<String>) -> Self {
        Self::AssistedTransport(msg.into())
    }

    pub fn assisted_envelope(msg: impl Into<String>) -> Self {
        Self::AssistedEnvelope(msg.into())
    }

    pub fn assisted_parse(msg: impl Into<String>) -> Self {
        Self::AssistedParse(msg.into())
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound(name.into())
    }

    pub fn tool_call(msg: impl Into<String>) -> Self {
        Self::ToolCall(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
