use chrono::{DateTime, Local};
use serde::Deserialize;

/// Length recorded for results without a duration badge (streams, premieres).
pub const LIVE_LENGTH: &str = "LIVE";

/// One video found on a results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub scraped_at: DateTime<Local>,
    /// Always 1: results beyond the first page are loaded dynamically.
    pub page_number: u32,
    /// Age as the site displayed it, e.g. "vor 3 Stunden".
    pub age_display: String,
    pub age_seconds: u64,
    /// Channel or creator name.
    pub source: String,
    pub title: String,
    /// Bare video id, not a URL.
    pub video_id: String,
    /// Duration as displayed ("12:34") or [`LIVE_LENGTH`].
    pub length: String,
}

impl ResultRecord {
    pub fn is_live(&self) -> bool {
        self.length == LIVE_LENGTH
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

// The site's internal renderer schema. Only the fields the parser reads are
// modelled; everything is optional so that the parser can name the field
// that is missing instead of failing on the first surprise.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRenderer {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<Text>,
    #[serde(default)]
    pub owner_text: Option<Text>,
    #[serde(default)]
    pub long_byline_text: Option<Text>,
    #[serde(default)]
    pub short_byline_text: Option<Text>,
    #[serde(default)]
    pub published_time_text: Option<Text>,
    #[serde(default)]
    pub thumbnail_overlays: Option<Vec<ThumbnailOverlay>>,
}

/// Display text, either a single `simpleText` or a list of styled `runs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default)]
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Option<Vec<Run>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub text: Option<String>,
}

impl Text {
    /// `simpleText` if set, else the text of the first run. Empty strings count
    /// as absent.
    pub fn first(&self) -> Option<&str> {
        let simple = self.simple_text.as_deref().filter(|s| !s.is_empty());
        simple.or_else(|| {
            self.runs
                .as_ref()?
                .first()?
                .text
                .as_deref()
                .filter(|s| !s.is_empty())
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailOverlay {
    #[serde(default)]
    pub thumbnail_overlay_time_status_renderer: Option<TimeStatusRenderer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeStatusRenderer {
    #[serde(default)]
    pub text: Option<Text>,
}
