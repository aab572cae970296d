//! Article data as served by the Briefly backend.
//!
//! Only the fields the read-aloud layer cares about are modelled; unknown
//! fields in the backend payload are ignored on deserialisation.

use serde::{Deserialize, Serialize};

/// AI-generated summary attached to an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleSummary {
    /// Short prose summary. This is the text that gets read aloud.
    pub executive_summary: String,

    /// Bullet-point highlights.
    pub key_points: Vec<String>,

    /// Longer analysis section, if the summariser produced one.
    pub analysis: Option<String>,

    /// Reader takeaways.
    pub takeaways: Vec<String>,

    /// Estimated minutes to read the summary.
    pub summary_read_time_minutes: Option<u32>,
}

/// A news article with its optional summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub source_name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub read_time_minutes: Option<u32>,

    #[serde(default)]
    pub summary: Option<ArticleSummary>,
}

impl Article {
    /// Create an article with no summary attached.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source_name: None,
            url: None,
            excerpt: None,
            read_time_minutes: None,
            summary: None,
        }
    }

    /// Attach a summary consisting of only an executive summary.
    #[must_use]
    pub fn with_summary(mut self, executive_summary: impl Into<String>) -> Self {
        self.summary = Some(ArticleSummary {
            executive_summary: executive_summary.into(),
            ..ArticleSummary::default()
        });
        self
    }

    /// Text to hand to the speech engine: `"{title}. {executive summary}"`.
    ///
    /// Returns `None` when there is no non-blank executive summary; such an
    /// article has nothing worth reading aloud.
    pub fn speech_text(&self) -> Option<String> {
        let summary = self.summary.as_ref()?.executive_summary.trim();
        if summary.is_empty() {
            return None;
        }

        let title = self.title.trim();
        if title.is_empty() {
            Some(summary.to_string())
        } else {
            Some(format!("{title}. {summary}"))
        }
    }
}
