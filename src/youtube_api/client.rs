//! Token exchange and authenticated request handling for the YouTube Data API.

use crate::config::Credentials;
use crate::error::Error;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, SystemTime};
use tracing::instrument;

/// Google's OAuth2 token endpoint, used to trade a refresh token for a
/// short-lived access token.
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Base URL for YouTube Data API v3 resources.
const API_BASE_URL: &str = "https://youtube.googleapis.com";

/// Deadline applied to each outbound HTTP request, covering connect through
/// body download. Without it a stalled Google endpoint would hang a tool call
/// indefinitely.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A short-lived OAuth2 bearer token returned by
/// [`TokenExchangeClient::exchange`].
///
/// Tokens are used for the duration of a single tool invocation and then
/// dropped; nothing in this crate caches or refreshes them.
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: String,
    obtained_at: SystemTime,
}

impl AccessToken {
    fn new(value: String) -> Self {
        Self {
            value,
            obtained_at: SystemTime::now(),
        }
    }

    /// The raw bearer token as it appears in `Authorization` headers.
    pub fn secret(&self) -> &str {
        &self.value
    }

    /// When the exchange that produced this token completed.
    pub fn obtained_at(&self) -> SystemTime {
        self.obtained_at
    }
}

/// The Data API `list` resources this server can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Videos,
    Subscriptions,
    Activities,
}

impl Resource {
    /// The path segment under `/youtube/v3/` for this resource.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Videos => "videos",
            Resource::Subscriptions => "subscriptions",
            Resource::Activities => "activities",
        }
    }
}

/// Successful response body from the token endpoint.
///
/// Google also returns `expires_in`, `scope`, and `token_type`, but tokens
/// here never outlive a single tool call, so only the token itself matters.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the two-step access pattern the YouTube tools share: exchange
/// the configured refresh token for an access token, then issue one
/// authenticated `GET` against a Data API resource.
///
/// Each operation builds a dedicated [`reqwest::Client`] that is dropped when
/// the call returns, so no connection state leaks between tool invocations
/// and an abandoned call tears its connection down with it.
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    credentials: Credentials,
    token_url: String,
    api_base_url: String,
    timeout: Duration,
}

impl TokenExchangeClient {
    /// Creates a client that talks to Google's production endpoints.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token_url: TOKEN_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the token endpoint and API base URL.
    ///
    /// Exists so tests can point the client at a local stub server; production
    /// code sticks with the defaults from [`TokenExchangeClient::new`].
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.api_base_url = api_base_url.into();
        self
    }

    /// Overrides the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Trades the configured refresh token for a fresh access token.
    ///
    /// Credentials are validated first; incomplete credentials fail with
    /// [`Error::Configuration`] before any request is built. A non-200 answer
    /// from the token endpoint becomes [`Error::TokenExchange`] carrying the
    /// response body, which is where Google reports `invalid_grant` and
    /// friends.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/identity/protocols/oauth2/web-server#offline>
    #[instrument(skip(self))]
    pub async fn exchange(&self) -> Result<AccessToken, Error> {
        self.credentials.validate()?;

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
        ];

        let client = self.http_client()?;
        let response = client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|err| self.transport_error(&self.token_url, err))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(status = %status, "token exchange rejected");
            return Err(Error::TokenExchange { status, body });
        }

        let token: TokenResponse = response.json().await.map_err(Error::TokenDecode)?;
        tracing::debug!("obtained fresh access token");
        Ok(AccessToken::new(token.access_token))
    }

    /// Issues an authenticated `GET` for one page of `resource` and returns
    /// the decoded JSON body as-is.
    ///
    /// A non-200 answer becomes [`Error::ApiRequest`] with the response body
    /// verbatim, so quota and permission messages survive for the caller.
    ///
    /// # Arguments
    ///
    /// * `resource` - Which Data API resource to list
    /// * `query` - Query parameters, e.g. `part` and `maxResults`
    /// * `token` - Access token from a preceding [`exchange`](Self::exchange)
    #[instrument(skip(self, token))]
    pub async fn fetch(
        &self,
        resource: Resource,
        query: &[(&str, &str)],
        token: &AccessToken,
    ) -> Result<serde_json::Value, Error> {
        let url = format!("{}/youtube/v3/{}", self.api_base_url, resource.path());

        let client = self.http_client()?;
        let response = client
            .get(&url)
            .query(query)
            .header("Authorization", format!("Bearer {}", token.secret()))
            .send()
            .await
            .map_err(|err| self.transport_error(&url, err))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(status = %status, url = %url, "YouTube API request failed");
            return Err(Error::ApiRequest { status, body });
        }

        response.json().await.map_err(Error::Http)
    }

    /// Builds the single-use HTTP client for one request.
    fn http_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::Http)
    }

    /// Distinguishes deadline expiry from other transport failures.
    fn transport_error(&self, url: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                deadline: self.timeout,
            }
        } else {
            Error::Http(err)
        }
    }
}
