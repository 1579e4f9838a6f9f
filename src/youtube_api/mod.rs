//! YouTube Data API v3 client.
//!
//! This module covers the read-only slice of the Data API the server's tools
//! need: trending videos, the authenticated user's subscriptions, and the
//! authenticated user's recent activity. Every operation follows the same
//! two-step shape:
//!
//! 1. [`TokenExchangeClient::exchange`] trades the configured OAuth2 refresh
//!    token for a short-lived access token, and
//! 2. [`TokenExchangeClient::fetch`] issues one authenticated `GET` against a
//!    [`Resource`] and hands back the decoded JSON page.
//!
//! Tokens are deliberately not cached: each tool invocation performs its own
//! exchange, keeping the client stateless at the cost of one extra round trip
//! per call. The typed models in [`videos`], [`subscriptions`], and
//! [`activities`] pick the few fields the tools render and ignore the rest.

pub mod activities;
pub mod client;
pub mod subscriptions;
pub mod videos;

// Re-export main types for convenience
pub use client::{AccessToken, Resource, TokenExchangeClient};

pub use activities::{Activity, ActivityListResponse};
pub use subscriptions::{Subscription, SubscriptionListResponse};
pub use videos::{Video, VideoListResponse};
