//! Source items handed to the engine by the ingestion stage.
//!
//! Items arrive already fetched, parsed, and deduplicated by normalized URL.
//! The engine never mutates them.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BriefingError;

/// Kind of outlet an item was published by.
///
/// Drives credibility, confidence, and the trust gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceType {
    /// First-party announcement (vendor blog, regulator, paper authors)
    Primary,
    /// Trade press
    Trade,
    /// General news outlet
    Mainstream,
    /// Industry analyst
    Analyst,
    /// Academic or lab research coverage
    Research,
    /// Individual commentator
    Influencer,
    /// Social media post
    Social,
}

impl SourceType {
    /// Stable label used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Primary => "Primary",
            SourceType::Trade => "Trade",
            SourceType::Mainstream => "Mainstream",
            SourceType::Analyst => "Analyst",
            SourceType::Research => "Research",
            SourceType::Influencer => "Influencer",
            SourceType::Social => "Social",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ingested feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    /// Upstream identifier, unique within a run
    pub id: String,

    /// Publisher display name
    pub publisher: String,

    pub title: String,

    pub url: String,

    /// Feed summary or lede
    #[serde(default)]
    pub summary: String,

    /// Outlet classification
    pub source_type: SourceType,

    /// When the publisher says the item went out
    pub published_at: DateTime<Utc>,

    /// When the ingestion stage fetched it
    pub retrieved_at: DateTime<Utc>,
}

impl SourceItem {
    /// Create a new item; `retrieved_at` defaults to `published_at`.
    pub fn new(
        id: impl Into<String>,
        publisher: impl Into<String>,
        title: impl Into<String>,
        source_type: SourceType,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            publisher: publisher.into(),
            title: title.into(),
            url: String::new(),
            summary: String::new(),
            source_type,
            published_at,
            retrieved_at: published_at,
        }
    }

    /// Attach a summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Attach a URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Primary flag, derived from the source type.
    pub fn is_primary(&self) -> bool {
        self.source_type == SourceType::Primary
    }

    /// Title and summary joined for text analysis.
    pub fn combined_text(&self) -> String {
        if self.summary.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.summary)
        }
    }

    /// Decode a JSON array of items, rejecting blank or repeated ids.
    pub fn parse_batch(json: &str) -> Result<Vec<SourceItem>, BriefingError> {
        let items: Vec<SourceItem> = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(BriefingError::InvalidInput(format!(
                    "item {:?} has an empty id",
                    item.title
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(BriefingError::InvalidInput(format!(
                    "duplicate item id {:?}",
                    item.id
                )));
            }
        }
        Ok(items)
    }
}
