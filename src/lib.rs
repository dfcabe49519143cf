//! MCP (Model Context Protocol) handler toolkit
//!
//! Handler registry, URI-template resolution and client capability
//! negotiation for processes acting as an MCP server or client. Wire
//! encoding and transport are left to an external JSON-RPC engine; this
//! crate starts where a decoded method name and params arrive.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod schema;
pub mod server;
pub mod syncmap;

// Test modules
#[cfg(test)]
pub mod tests;

// Re-export key types
pub use config::{HandlerConfig, LogFormat};
pub use error::{McpError, McpResult};
pub use server::{DefaultHandler, Dispatcher, Handler, HandlerDeps, Operations, Registry};
pub use syncmap::SyncMap;
