//! The three YouTube operations exposed to tool callers.
//!
//! Every tool follows the same flow: exchange the refresh token for an access
//! token, fetch one page of the relevant Data API resource with that token,
//! and flatten the items into a text block. Failures never propagate out of
//! the `get_*` entry points; they come back as an `"Error: ..."` string so
//! the harness always receives something it can show.

use crate::config::Credentials;
use crate::error::Error;
use crate::youtube_api::{
    ActivityListResponse, Resource, SubscriptionListResponse, TokenExchangeClient,
    VideoListResponse,
};
use serde::Deserialize;

/// Arguments for [`YouTubeTools::get_trending_videos`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendingVideosArgs {
    /// ISO 3166-1 alpha-2 country code to chart against.
    pub region_code: String,
    /// Maximum number of videos to return.
    pub max_results: u32,
}

impl Default for TrendingVideosArgs {
    fn default() -> Self {
        Self {
            region_code: "US".to_string(),
            max_results: 30,
        }
    }
}

/// Arguments for [`YouTubeTools::get_subscribed_channels`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubscribedChannelsArgs {
    /// Maximum number of channels to return.
    pub max_channels: u32,
}

impl Default for SubscribedChannelsArgs {
    fn default() -> Self {
        Self { max_channels: 10 }
    }
}

/// Arguments for [`YouTubeTools::get_user_activity`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserActivityArgs {
    /// Maximum number of activity entries to return.
    pub max_results: u32,
}

impl Default for UserActivityArgs {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

/// The tool surface of the server: three read-only YouTube lookups.
///
/// Each invocation is independent. There is no shared token, connection, or
/// cache, so concurrent calls cannot interfere with each other and an aborted
/// call leaves nothing behind.
#[derive(Debug, Clone)]
pub struct YouTubeTools {
    client: TokenExchangeClient,
}

impl YouTubeTools {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: TokenExchangeClient::new(credentials),
        }
    }

    /// Builds the tool surface around an existing client, preserving any
    /// endpoint or deadline overrides it carries.
    pub fn with_client(client: TokenExchangeClient) -> Self {
        Self { client }
    }

    /// Lists the videos currently trending on YouTube.
    ///
    /// Returns one five-line block per video separated by newlines, or an
    /// `"Error: ..."` string on failure.
    #[tracing::instrument(skip(self), ret)]
    pub async fn get_trending_videos(&self, args: TrendingVideosArgs) -> String {
        self.trending_videos(args)
            .await
            .unwrap_or_else(|err| self.report(err, "get_trending_videos"))
    }

    /// Lists the channels the authenticated user is subscribed to.
    ///
    /// Returns one `Channel: ...` line per subscription, or an
    /// `"Error: ..."` string on failure.
    #[tracing::instrument(skip(self), ret)]
    pub async fn get_subscribed_channels(&self, args: SubscribedChannelsArgs) -> String {
        self.subscribed_channels(args)
            .await
            .unwrap_or_else(|err| self.report(err, "get_subscribed_channels"))
    }

    /// Lists the authenticated user's recent channel activity.
    ///
    /// Returns one `Activity: ...` line per entry, or an `"Error: ..."`
    /// string on failure.
    #[tracing::instrument(skip(self), ret)]
    pub async fn get_user_activity(&self, args: UserActivityArgs) -> String {
        self.user_activity(args)
            .await
            .unwrap_or_else(|err| self.report(err, "get_user_activity"))
    }

    pub(crate) async fn trending_videos(&self, args: TrendingVideosArgs) -> Result<String, Error> {
        let token = self.client.exchange().await?;

        let max_results = args.max_results.to_string();
        let query = [
            ("part", "snippet"),
            ("chart", "mostPopular"),
            ("regionCode", args.region_code.as_str()),
            ("maxResults", max_results.as_str()),
        ];
        let payload = self.client.fetch(Resource::Videos, &query, &token).await?;

        let listing: VideoListResponse =
            serde_json::from_value(payload).map_err(|source| Error::Payload {
                resource: "videos",
                source,
            })?;
        Ok(listing
            .items
            .iter()
            .map(|video| video.render())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub(crate) async fn subscribed_channels(
        &self,
        args: SubscribedChannelsArgs,
    ) -> Result<String, Error> {
        let token = self.client.exchange().await?;

        let max_results = args.max_channels.to_string();
        let query = [
            ("part", "snippet"),
            ("mine", "true"),
            ("maxResults", max_results.as_str()),
        ];
        let payload = self
            .client
            .fetch(Resource::Subscriptions, &query, &token)
            .await?;

        let listing: SubscriptionListResponse =
            serde_json::from_value(payload).map_err(|source| Error::Payload {
                resource: "subscriptions",
                source,
            })?;
        Ok(listing
            .items
            .iter()
            .map(|subscription| subscription.render())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub(crate) async fn user_activity(&self, args: UserActivityArgs) -> Result<String, Error> {
        let token = self.client.exchange().await?;

        let max_results = args.max_results.to_string();
        let query = [
            ("part", "snippet,contentDetails"),
            ("mine", "true"),
            ("maxResults", max_results.as_str()),
        ];
        let payload = self
            .client
            .fetch(Resource::Activities, &query, &token)
            .await?;

        let listing: ActivityListResponse =
            serde_json::from_value(payload).map_err(|source| Error::Payload {
                resource: "activities",
                source,
            })?;
        Ok(listing
            .items
            .iter()
            .map(|activity| activity.render())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Logs a failed tool run and produces its caller-visible string.
    fn report(&self, err: Error, tool: &str) -> String {
        tracing::warn!(tool, error = %err, "tool invocation failed");
        err.tool_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    #[test]
    fn trending_args_default_to_us_top_30() {
        let args: TrendingVideosArgs = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(args.region_code, "US");
        assert_eq!(args.max_results, 30);
    }

    #[test]
    fn trending_args_accept_overrides() {
        let args: TrendingVideosArgs =
            serde_json::from_value(serde_json::json!({"region_code": "SE", "max_results": 5}))
                .unwrap();
        assert_eq!(args.region_code, "SE");
        assert_eq!(args.max_results, 5);
    }

    #[test]
    fn listing_args_default_to_10() {
        let args: SubscribedChannelsArgs = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(args.max_channels, 10);

        let args: UserActivityArgs = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(args.max_results, 10);
    }

    fn tools_against(server: &mockito::Server) -> YouTubeTools {
        let client = TokenExchangeClient::new(Credentials::new("cid", "csecret", "rtoken"))
            .with_endpoints(format!("{}/token", server.url()), server.url());
        YouTubeTools::with_client(client)
    }

    async fn mock_token(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "tok"}"#)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn trending_videos_render_one_block_per_item() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _videos = server
            .mock("GET", "/youtube/v3/videos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("part".into(), "snippet".into()),
                Matcher::UrlEncoded("chart".into(), "mostPopular".into()),
                Matcher::UrlEncoded("regionCode".into(), "US".into()),
                Matcher::UrlEncoded("maxResults".into(), "30".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "kind": "youtube#videoListResponse",
                    "items": [
                        {
                            "id": "vid-1",
                            "snippet": {
                                "title": "First",
                                "channelTitle": "Channel One",
                                "publishedAt": "2025-08-01T00:00:00Z",
                                "description": "first video"
                            }
                        },
                        {
                            "id": "vid-2",
                            "snippet": {
                                "title": "Second",
                                "channelTitle": "Channel Two",
                                "publishedAt": "2025-08-02T00:00:00Z",
                                "description": ""
                            }
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = tools_against(&server)
            .get_trending_videos(TrendingVideosArgs::default())
            .await;

        assert_eq!(
            text,
            "Title: First\n\
             Channel: Channel One\n\
             Published: 2025-08-01T00:00:00Z\n\
             Description: first video...\n\
             Link: https://www.youtube.com/watch?v=vid-1\n\
             ---\n\
             Title: Second\n\
             Channel: Channel Two\n\
             Published: 2025-08-02T00:00:00Z\n\
             Description: ...\n\
             Link: https://www.youtube.com/watch?v=vid-2\n\
             ---"
        );
    }

    #[tokio::test]
    async fn subscriptions_ask_for_the_callers_own_channels() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let listing = server
            .mock("GET", "/youtube/v3/subscriptions")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("part".into(), "snippet".into()),
                Matcher::UrlEncoded("mine".into(), "true".into()),
                Matcher::UrlEncoded("maxResults".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"items": [
                    {"snippet": {"title": "Computerphile"}},
                    {"snippet": {"title": "Numberphile"}}
                ]}"#,
            )
            .create_async()
            .await;

        let text = tools_against(&server)
            .get_subscribed_channels(SubscribedChannelsArgs::default())
            .await;

        assert_eq!(text, "Channel: Computerphile\nChannel: Numberphile");
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn activity_requests_snippet_and_content_details() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let listing = server
            .mock("GET", "/youtube/v3/activities")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("part".into(), "snippet,contentDetails".into()),
                Matcher::UrlEncoded("mine".into(), "true".into()),
                Matcher::UrlEncoded("maxResults".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items": [{"snippet": {"title": "Uploaded a video"}}]}"#)
            .create_async()
            .await;

        let text = tools_against(&server)
            .get_user_activity(UserActivityArgs::default())
            .await;

        assert_eq!(text, "Activity: Uploaded a video");
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn api_rejections_surface_googles_message() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _videos = server
            .mock("GET", "/youtube/v3/videos")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let text = tools_against(&server)
            .get_trending_videos(TrendingVideosArgs::default())
            .await;

        assert_eq!(text, "Error: quota exceeded");
    }

    #[tokio::test]
    async fn token_rejections_become_error_strings() {
        let mut server = mockito::Server::new_async().await;
        let _token = server
            .mock("POST", "/token")
            .with_status(401)
            .with_body("invalid_grant")
            .create_async()
            .await;

        let text = tools_against(&server)
            .get_subscribed_channels(SubscribedChannelsArgs::default())
            .await;

        assert_eq!(
            text,
            "Error: token exchange failed with status 401 Unauthorized: invalid_grant"
        );
    }

    #[tokio::test]
    async fn each_invocation_exchanges_its_own_token() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "tok"}"#)
            .expect(2)
            .create_async()
            .await;
        let listing = server
            .mock("GET", "/youtube/v3/activities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items": [{"snippet": {"title": "Liked a video"}}]}"#)
            .expect(2)
            .create_async()
            .await;

        let tools = tools_against(&server);
        let first = tools.get_user_activity(UserActivityArgs::default()).await;
        let second = tools.get_user_activity(UserActivityArgs::default()).await;

        assert_eq!(first, second);
        token.assert_async().await;
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn empty_listings_render_as_an_empty_string() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _listing = server
            .mock("GET", "/youtube/v3/subscriptions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let text = tools_against(&server)
            .get_subscribed_channels(SubscribedChannelsArgs::default())
            .await;

        assert_eq!(text, "");
    }
}
