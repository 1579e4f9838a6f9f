//! YouTube Activities API types and text rendering.

use serde::{Deserialize, Serialize};

/// Response structure for the `activities.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/activities/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityListResponse {
    /// A list of activities that match the request criteria.
    #[serde(default)]
    pub items: Vec<Activity>,
}

/// An `activity` resource: something the channel did, such as uploading a
/// video or liking one.
///
/// See: <https://developers.google.com/youtube/v3/docs/activities#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Activity {
    /// Basic details about the activity.
    pub snippet: ActivitySnippet,
}

/// Basic details about the activity.
///
/// See: <https://developers.google.com/youtube/v3/docs/activities#snippet>
#[derive(Debug, Serialize, Deserialize)]
pub struct ActivitySnippet {
    /// The title of the resource primarily associated with the activity.
    pub title: String,
}

impl Activity {
    /// Renders the one-line entry the activity tool emits.
    pub fn render(&self) -> String {
        format!("Activity: {}", self.snippet.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_names_the_activity() {
        let activity = Activity {
            snippet: ActivitySnippet {
                title: "Uploaded: Rust in 100 Seconds".to_string(),
            },
        };
        assert_eq!(activity.render(), "Activity: Uploaded: Rust in 100 Seconds");
    }
}
