//! Error taxonomy for credential handling, token exchange, and Data API calls.

use reqwest::StatusCode;
use std::time::Duration;

/// Everything that can go wrong between "the server has credentials" and "the
/// server has formatted text to hand back".
///
/// Variants are deliberately coarse: callers either log them, match on them in
/// tests, or flatten them into a tool-visible string via
/// [`tool_message`](Error::tool_message).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more OAuth credential fields were absent or empty.
    ///
    /// Raised before any network traffic so a misconfigured deployment fails
    /// without touching Google's endpoints.
    #[error("missing YouTube OAuth credentials: {missing}")]
    Configuration {
        /// Comma-separated environment variable names that were not set.
        missing: String,
    },

    /// The token endpoint answered, but not with HTTP 200.
    #[error("token exchange failed with status {status}: {body}")]
    TokenExchange { status: StatusCode, body: String },

    /// The token endpoint answered 200 with a body we could not decode, or one
    /// without an `access_token` field.
    #[error("token endpoint returned an undecodable success response")]
    TokenDecode(#[source] reqwest::Error),

    /// A Data API resource request answered, but not with HTTP 200.
    ///
    /// `body` is the response body verbatim, so quota and permission messages
    /// from Google survive all the way to the caller.
    #[error("YouTube API request failed with status {status}: {body}")]
    ApiRequest { status: StatusCode, body: String },

    /// A 200 response whose JSON did not match the expected resource shape.
    #[error("unexpected {resource} response payload")]
    Payload {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// No complete response arrived within the per-request deadline.
    #[error("request to {url} did not complete within {deadline:?}")]
    Timeout { url: String, deadline: Duration },

    /// Transport-level failure: connect, TLS, or reading the response body.
    #[error("HTTP transport failure")]
    Http(#[source] reqwest::Error),
}

impl Error {
    /// Flattens this error into the `"Error: ..."` string shape that tool
    /// callers see in place of formatted results.
    ///
    /// For [`Error::ApiRequest`] only the response body is included, so a
    /// quota failure reads `Error: quota exceeded` rather than burying
    /// Google's message behind status boilerplate.
    pub fn tool_message(&self) -> String {
        match self {
            Error::ApiRequest { body, .. } => format!("Error: {body}"),
            other => format!("Error: {other}"),
        }
    }
}
