//! YouTube Subscriptions API types and text rendering.

use serde::{Deserialize, Serialize};

/// Response structure for the `subscriptions.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionListResponse {
    /// A list of subscriptions that match the request criteria.
    #[serde(default)]
    pub items: Vec<Subscription>,
}

/// A `subscription` resource: one channel the authenticated user follows.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Subscription {
    /// Basic details about the subscription.
    pub snippet: SubscriptionSnippet,
}

/// Basic details about the subscription.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#snippet>
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionSnippet {
    /// The subscription's title, i.e. the name of the subscribed channel.
    pub title: String,
}

impl Subscription {
    /// Renders the one-line entry the subscriptions tool emits.
    pub fn render(&self) -> String {
        format!("Channel: {}", self.snippet.title)
    }
}
