//! YouTube Videos API types and text rendering.

use serde::{Deserialize, Serialize};

/// Response structure for the `videos.list` API call.
///
/// Only `items` is consumed here; the tools read a single page and ignore
/// pagination and resource-kind metadata.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// A list of videos that match the request criteria.
    #[serde(default)]
    pub items: Vec<Video>,
}

/// A `video` resource represents a YouTube video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    /// Basic details about the video.
    pub snippet: VideoSnippet,
}

/// Basic details about the video: title, channel, and description.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoSnippet {
    /// The video's title.
    pub title: String,
    /// The channel title for the channel that the video belongs to.
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    /// The date and time that the video was published, as an ISO 8601 string.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    /// The video's description. Empty when the uploader did not write one.
    #[serde(default)]
    pub description: String,
}

impl Video {
    /// Renders the video as the multi-line block the trending tool emits:
    /// title, channel, publication date, a description clipped to 200
    /// characters, a watch link, and a `---` separator line.
    pub fn render(&self) -> String {
        format!(
            "Title: {}\nChannel: {}\nPublished: {}\nDescription: {}...\nLink: https://www.youtube.com/watch?v={}\n---",
            self.snippet.title,
            self.snippet.channel_title,
            self.snippet.published_at,
            truncate_chars(&self.snippet.description, 200),
            self.id,
        )
    }
}

/// Clips `s` to at most `max` characters without splitting a multi-byte
/// character.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
