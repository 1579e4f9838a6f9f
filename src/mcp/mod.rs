//! MCP server plumbing: wire types and the stdio request loop.
//!
//! The server speaks newline-delimited JSON-RPC 2.0 on stdin/stdout, as
//! described by the Model Context Protocol's stdio transport. It is
//! deliberately stateless between requests: `initialize` is answered but not
//! required before other methods, and each `tools/call` performs its own
//! authentication against the YouTube API.

pub mod protocol;
pub mod server;

// Re-export main types for convenience
pub use protocol::{PROTOCOL_VERSION, ToolDef};
pub use server::{McpServer, tool_definitions};
