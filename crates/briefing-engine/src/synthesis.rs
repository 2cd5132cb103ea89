//! Editorial text for a cluster: title, intel line, context, effects,
//! contradictions, and timeline.
//!
//! Synthesis is template driven and never fails on odd input; length limits
//! are enforced here by truncation and re-checked by validation.

use regex::Regex;

use briefing_types::{
    Confidence, Score, SourceItem, SourceRef, Subdomain, TimelineEntry, TopicCandidate,
    TopicContext,
};

use crate::clustering::Cluster;
use crate::error::EngineError;
use crate::normalizer::{compile_all, Normalizer, OTHER_ENTITY};
use crate::rules::ScoringRules;
use crate::validation::{
    MAX_CONTEXT_LEN, MAX_CONTRADICTIONS, MAX_CONTRADICTION_LEN, MAX_EFFECT_LEN, MAX_INTEL_LEN,
    MAX_TITLE_LEN, MIN_TIMELINE,
};

const ELLIPSIS: char = '…';

/// Padding event used when a cluster has fewer than three members.
pub const SINGLE_SOURCE_EVENT: &str = "(single source)";

/// `who` when no named entity was found.
pub const BROAD_ECOSYSTEM: &str = "Broad AI ecosystem";

/// Shorten to at most `limit` characters, cutting on a word boundary and
/// appending an ellipsis when anything was removed.
pub fn truncate(text: &str, limit: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }

    let budget = limit - 1;
    let head: String = text.chars().take(budget).collect();
    let at_boundary = text.chars().nth(budget).is_some_and(char::is_whitespace);
    let cut = if at_boundary {
        head.as_str()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => &head[..idx],
            _ => head.as_str(),
        }
    };
    let cut =
        cut.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'));
    format!("{cut}{ELLIPSIS}")
}

/// Text up to and including the first sentence terminator followed by
/// whitespace, or the whole trimmed text.
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some((_, next)) = chars.peek() {
                if next.is_whitespace() {
                    return &text[..idx + c.len_utf8()];
                }
            }
        }
    }
    text
}

/// Alias-folded title and summary of every member, newest first.
pub fn cluster_text(normalizer: &Normalizer, members: &[SourceItem]) -> String {
    let joined = members
        .iter()
        .map(SourceItem::combined_text)
        .collect::<Vec<_>>()
        .join(" ");
    normalizer.fold_aliases(&joined)
}

fn why_it_matters(subdomain: Subdomain) -> &'static str {
    match subdomain {
        Subdomain::Security => "Exposure for teams running affected AI systems",
        Subdomain::Regulation => "Changes compliance obligations for AI builders",
        Subdomain::Infrastructure => "Shifts compute supply and cost for AI workloads",
        Subdomain::Apps => "Changes how people use AI tools in daily work",
        Subdomain::Business => "Moves capital and competition in the AI market",
        Subdomain::Models => "Resets the capability baseline for AI models",
    }
}

fn effects(subdomain: Subdomain) -> [&'static str; 2] {
    match subdomain {
        Subdomain::Security => [
            "Expect patches and advisories from affected vendors",
            "Security reviews of AI deployments are likely to tighten",
        ],
        Subdomain::Regulation => [
            "Providers may adjust products and disclosures to stay compliant",
            "Other jurisdictions may follow with similar rules",
        ],
        Subdomain::Infrastructure => [
            "Compute pricing and availability may shift for AI teams",
            "Competing hardware vendors may answer with roadmap updates",
        ],
        Subdomain::Apps => [
            "Rival products may ship comparable features",
            "Workflows built on these tools may need updating",
        ],
        Subdomain::Business => [
            "Competitors may respond with deals or new funding",
            "Valuations across the sector may adjust",
        ],
        Subdomain::Models => [
            "Developers may re-run evaluations against the new baseline",
            "Competing labs may accelerate their own releases",
        ],
    }
}

/// Builds topic candidates from clusters.
pub struct Synthesizer {
    dispute: Vec<Regex>,
}

impl Synthesizer {
    pub fn new(rules: &ScoringRules) -> Result<Self, EngineError> {
        Ok(Self {
            dispute: compile_all(&rules.dispute_patterns)?,
        })
    }

    fn disputes(&self, item: &SourceItem) -> bool {
        let text = item.combined_text();
        self.dispute.iter().any(|p| p.is_match(&text))
    }

    /// Members that dispute the story while others report it, newest first.
    pub fn contradictions(&self, members: &[SourceItem]) -> Vec<String> {
        let disputing: Vec<&SourceItem> = members.iter().filter(|m| self.disputes(m)).collect();
        if disputing.is_empty() || disputing.len() == members.len() {
            return Vec::new();
        }
        disputing
            .into_iter()
            .take(MAX_CONTRADICTIONS)
            .map(|m| {
                truncate(
                    &format!("{} disputes: {}", m.publisher, m.title.trim()),
                    MAX_CONTRADICTION_LEN,
                )
            })
            .collect()
    }

    /// Three most recent members oldest first, padded to three entries.
    pub fn timeline(&self, members: &[SourceItem]) -> Vec<TimelineEntry> {
        let Some(latest) = members.first() else {
            return Vec::new();
        };

        let mut timeline: Vec<TimelineEntry> = members
            .iter()
            .take(MIN_TIMELINE)
            .rev()
            .map(|m| TimelineEntry {
                date: m.published_at.date_naive(),
                event: truncate(&format!("{}: {}", m.publisher, m.title.trim()), MAX_INTEL_LEN),
                source_ids: vec![m.id.clone()],
            })
            .collect();

        while timeline.len() < MIN_TIMELINE {
            timeline.push(TimelineEntry {
                date: latest.published_at.date_naive(),
                event: SINGLE_SOURCE_EVENT.to_string(),
                source_ids: vec![latest.id.clone()],
            });
        }
        timeline
    }

    /// Draft a candidate for a cluster.
    ///
    /// Score, confidence, and briefing reason are placeholders until the
    /// candidate is scored and gated. Returns `None` for an empty cluster.
    pub fn synthesize(
        &self,
        id: String,
        cluster: &Cluster,
        normalizer: &Normalizer,
    ) -> Option<TopicCandidate> {
        let latest = cluster.members.first()?;

        let folded_title = normalizer.fold_aliases(latest.title.trim());
        let title = if folded_title.trim().is_empty() {
            format!("{} update", cluster.entity)
        } else {
            truncate(&folded_title, MAX_TITLE_LEN)
        };

        let lede = first_sentence(&latest.summary);
        let lede = if lede.is_empty() { title.as_str() } else { lede };
        let intel = truncate(&format!("{}: {}", latest.publisher, lede), MAX_INTEL_LEN);

        let text = cluster_text(normalizer, &cluster.members);
        let entities = normalizer.extract_entities(&text);
        let keywords = normalizer.extract_keywords(&text);

        let named: Vec<&str> = entities
            .iter()
            .map(String::as_str)
            .filter(|e| *e != OTHER_ENTITY)
            .collect();
        let who = if named.is_empty() {
            BROAD_ECOSYSTEM.to_string()
        } else {
            truncate(&named.join(", "), MAX_CONTEXT_LEN)
        };

        let context = TopicContext {
            what: truncate(&title, MAX_CONTEXT_LEN),
            why: truncate(why_it_matters(cluster.subdomain), MAX_CONTEXT_LEN),
            who,
        };

        Some(TopicCandidate {
            id,
            title,
            intel,
            context,
            second_order_effects: effects(cluster.subdomain)
                .iter()
                .map(|e| truncate(e, MAX_EFFECT_LEN))
                .collect(),
            contradictions: self.contradictions(&cluster.members),
            subdomain: cluster.subdomain,
            score: Score::default(),
            confidence: Confidence::Low,
            briefing_reason: String::new(),
            entities,
            keywords,
            timeline: self.timeline(&cluster.members),
            sources: cluster.members.iter().map(SourceRef::from).collect(),
        })
    }
}

/// Topic identifier `<prefix>-<date>-<NN>`, 1-based.
///
/// The sequence is zero-padded to two digits; past 99 clusters it widens
/// (`-100`, `-101`, ...) so identifiers stay unique within a run.
pub fn topic_id(prefix: &str, date_label: &str, ordinal: usize) -> String {
    format!("{prefix}-{date_label}-{ordinal:02}")
}
