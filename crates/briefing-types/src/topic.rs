//! Topic candidate types produced by the engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::source::{SourceItem, SourceType};

/// A unique identifier for a topic, `<prefix>-<date>-<NN>`.
pub type TopicId = String;

/// Editorial subdomain of the briefing's topic domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subdomain {
    /// Vulnerabilities, jailbreaks, breaches
    Security,
    /// Law, policy, litigation
    Regulation,
    /// Chips, datacenters, compute
    Infrastructure,
    /// Products and productivity features
    Apps,
    /// Funding, deals, markets
    Business,
    /// New or updated models
    Models,
}

impl Subdomain {
    /// Short code used in config files and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subdomain::Security => "security",
            Subdomain::Regulation => "regulation",
            Subdomain::Infrastructure => "infrastructure",
            Subdomain::Apps => "apps",
            Subdomain::Business => "business",
            Subdomain::Models => "models",
        }
    }
}

impl std::fmt::Display for Subdomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse trust label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Med,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Med => write!(f, "Med"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// Upper bound of the relevance subscore.
pub const MAX_RELEVANCE: u8 = 5;
/// Upper bound of the impact subscore.
pub const MAX_IMPACT: u8 = 5;
/// Upper bound of the novelty subscore.
pub const MAX_NOVELTY: u8 = 3;
/// Upper bound of the credibility subscore.
pub const MAX_CREDIBILITY: u8 = 5;
/// Upper bound of the time-sensitivity subscore.
pub const MAX_TIME_SENSITIVITY: u8 = 4;
/// Upper bound of the total.
pub const MAX_TOTAL: u8 = 22;

/// Rubric score of a topic.
///
/// Construct through [`Score::new`] so that every subscore is clamped to its
/// range and `total` stays the clamped sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub relevance: u8,
    pub impact: u8,
    pub novelty: u8,
    pub credibility: u8,
    pub time_sensitivity: u8,
    pub total: u8,
}

impl Score {
    /// Build a score, clamping each subscore and the total.
    pub fn new(
        relevance: u8,
        impact: u8,
        novelty: u8,
        credibility: u8,
        time_sensitivity: u8,
    ) -> Self {
        let relevance = relevance.min(MAX_RELEVANCE);
        let impact = impact.min(MAX_IMPACT);
        let novelty = novelty.min(MAX_NOVELTY);
        let credibility = credibility.min(MAX_CREDIBILITY);
        let time_sensitivity = time_sensitivity.min(MAX_TIME_SENSITIVITY);
        let sum = u16::from(relevance)
            + u16::from(impact)
            + u16::from(novelty)
            + u16::from(credibility)
            + u16::from(time_sensitivity);
        Self {
            relevance,
            impact,
            novelty,
            credibility,
            time_sensitivity,
            total: sum.min(u16::from(MAX_TOTAL)) as u8,
        }
    }

    /// Unclamped sum of the subscores.
    pub fn subscore_sum(&self) -> u16 {
        u16::from(self.relevance)
            + u16::from(self.impact)
            + u16::from(self.novelty)
            + u16::from(self.credibility)
            + u16::from(self.time_sensitivity)
    }
}

/// Context triple shown under a topic headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContext {
    /// What happened
    pub what: String,
    /// Why it matters
    pub why: String,
    /// Who is affected
    pub who: String,
}

/// One dated event on a topic timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    pub event: String,
    /// Sources backing the event
    pub source_ids: Vec<String>,
}

/// Reference to a member source carried on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub publisher: String,
    pub title: String,
    pub url: String,
    pub source_type: SourceType,
    pub published_at: DateTime<Utc>,
}

impl From<&SourceItem> for SourceRef {
    fn from(item: &SourceItem) -> Self {
        Self {
            id: item.id.clone(),
            publisher: item.publisher.clone(),
            title: item.title.clone(),
            url: item.url.clone(),
            source_type: item.source_type,
            published_at: item.published_at,
        }
    }
}

/// The editorial unit derived from one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCandidate {
    pub id: TopicId,
    pub title: String,
    /// One-line intel summary
    pub intel: String,
    pub context: TopicContext,
    pub second_order_effects: Vec<String>,
    #[serde(default)]
    pub contradictions: Vec<String>,
    pub subdomain: Subdomain,
    pub score: Score,
    pub confidence: Confidence,
    /// Why the topic landed where it did
    pub briefing_reason: String,
    pub entities: Vec<String>,
    pub keywords: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub sources: Vec<SourceRef>,
}

impl TopicCandidate {
    /// Publish time of the newest member source.
    pub fn latest_published(&self) -> Option<DateTime<Utc>> {
        self.sources.iter().map(|s| s.published_at).max()
    }
}
