//! An MCP server that exposes read-only YouTube Data API v3 lookups as tools.
//!
//! The server speaks the Model Context Protocol over stdin/stdout and offers
//! three tools:
//!
//! - `get_trending_videos`: the videos currently trending, per region
//! - `get_subscribed_channels`: the channels the configured account follows
//! - `get_user_activity`: the configured account's recent channel activity
//!
//! Authentication uses a pre-provisioned OAuth2 refresh token: every tool
//! invocation trades it for a short-lived access token and then issues a
//! single authenticated request against the Data API. Credentials come from
//! the `YOUTUBE_REFRESH_TOKEN`, `YOUTUBE_CLIENT_ID`, and
//! `YOUTUBE_CLIENT_SECRET` environment variables (a `.env` file works too).
//!
//! Tool failures are not protocol failures: whatever goes wrong mid-call,
//! the caller receives an `"Error: ..."` text result and the server keeps
//! serving.

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod youtube_api;

pub use config::Credentials;
pub use error::Error;
pub use mcp::McpServer;
pub use tools::YouTubeTools;
