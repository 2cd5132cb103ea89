//! Run-scoped inputs and the run result.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::topic::TopicCandidate;

/// Values supplied by the caller for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Clusters whose earliest member predates this are dropped
    pub window_start: DateTime<Utc>,

    /// Label used to namespace topic identifiers (e.g. "2025-03-01")
    pub date_label: String,

    /// Publisher name -> always_show override flag
    #[serde(default)]
    pub always_show: HashMap<String, bool>,
}

impl RunContext {
    /// Create a context with no publisher overrides.
    pub fn new(window_start: DateTime<Utc>, date_label: impl Into<String>) -> Self {
        Self {
            window_start,
            date_label: date_label.into(),
            always_show: HashMap::new(),
        }
    }

    /// Attach publisher overrides.
    pub fn with_always_show(mut self, always_show: HashMap<String, bool>) -> Self {
        self.always_show = always_show;
        self
    }

    /// Whether the publisher is flagged `always_show`.
    pub fn is_always_show(&self, publisher: &str) -> bool {
        self.always_show.get(publisher).copied().unwrap_or(false)
    }
}

/// Why a candidate did not make the briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Credibility,
    Relevance,
    SourceCount,
    OutsideWindow,
    Diversity,
    SocialOnly,
}

impl ExclusionReason {
    /// Whether the reason is a failed trust gate (override-reinjectable).
    pub fn is_trust_gate(&self) -> bool {
        matches!(
            self,
            ExclusionReason::Credibility | ExclusionReason::Relevance | ExclusionReason::SourceCount
        )
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Credibility => write!(f, "credibility"),
            ExclusionReason::Relevance => write!(f, "relevance"),
            ExclusionReason::SourceCount => write!(f, "source_count"),
            ExclusionReason::OutsideWindow => write!(f, "outside_window"),
            ExclusionReason::Diversity => write!(f, "diversity"),
            ExclusionReason::SocialOnly => write!(f, "social_only"),
        }
    }
}

/// Named exclusion counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExclusionCounts {
    pub credibility: u32,
    pub relevance: u32,
    pub source_count: u32,
    pub outside_window: u32,
    pub diversity: u32,
    pub social_only: u32,
}

impl ExclusionCounts {
    /// Increment the counter for a reason.
    pub fn record(&mut self, reason: ExclusionReason) {
        let slot = match reason {
            ExclusionReason::Credibility => &mut self.credibility,
            ExclusionReason::Relevance => &mut self.relevance,
            ExclusionReason::SourceCount => &mut self.source_count,
            ExclusionReason::OutsideWindow => &mut self.outside_window,
            ExclusionReason::Diversity => &mut self.diversity,
            ExclusionReason::SocialOnly => &mut self.social_only,
        };
        *slot = slot.saturating_add(1);
    }

    /// Sum of all counters.
    pub fn total(&self) -> u32 {
        self.credibility
            + self.relevance
            + self.source_count
            + self.outside_window
            + self.diversity
            + self.social_only
    }
}

/// Output of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub briefing_topics: Vec<TopicCandidate>,
    pub queued_topics: Vec<TopicCandidate>,
    pub excluded_reasons: ExclusionCounts,
}

impl RunResult {
    /// Whether a topic id is present in either list.
    pub fn contains(&self, topic_id: &str) -> bool {
        self.briefing_topics
            .iter()
            .chain(self.queued_topics.iter())
            .any(|t| t.id == topic_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_exclusion_counts_record() {
        let mut counts = ExclusionCounts::default();
        counts.record(ExclusionReason::SocialOnly);
        counts.record(ExclusionReason::SocialOnly);
        counts.record(ExclusionReason::Diversity);
        assert_eq!(counts.social_only, 2);
        assert_eq!(counts.diversity, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_exclusion_reason_trust_gates() {
        assert!(!ExclusionReason::OutsideWindow.is_trust_gate());
        assert!(!ExclusionReason::SocialOnly.is_trust_gate());
        assert!(ExclusionReason::SourceCount.is_trust_gate());
        assert!(!ExclusionReason::Diversity.is_trust_gate());
    }

    #[test]
    fn test_exclusion_counts_serialization() {
        let mut counts = ExclusionCounts::default();
        counts.record(ExclusionReason::OutsideWindow);
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["outside_window"], 1);
        assert_eq!(json["source_count"], 0);
    }

    #[test]
    fn test_run_context_always_show() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let mut flags = HashMap::new();
        flags.insert("OpenAI Blog".to_string(), true);
        flags.insert("Rumor Mill".to_string(), false);
        let ctx = RunContext::new(start, "2025-03-01").with_always_show(flags);
        assert!(ctx.is_always_show("OpenAI Blog"));
        assert!(!ctx.is_always_show("Rumor Mill"));
        assert!(!ctx.is_always_show("Unknown"));
    }
}
