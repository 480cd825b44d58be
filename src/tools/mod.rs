//! Tool metadata: the session's catalog of discovered tools.
//!
//! Descriptors are read from the tool server's discovery response; the
//! implementations stay on the server side of the transport.

pub mod catalog;

pub use catalog::{ParamSpec, ParamType, ToolCatalog, ToolDescriptor};
