//! Rubric scoring for candidate clusters.
//!
//! Credibility is derived from the mix of member source types and
//! publishers; the remaining subscores come from the subdomain and the
//! impact/urgency language tables. Every subscore is clamped to its range
//! and the total is the clamped sum (see [`Score::new`]).

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use regex::Regex;

use briefing_types::{Score, SourceItem, SourceType, Subdomain, MAX_CREDIBILITY};

use crate::error::EngineError;
use crate::normalizer::compile_all;
use crate::rules::ScoringRules;

/// Novelty is not estimated; every candidate gets the same value.
pub const BASE_NOVELTY: u8 = 2;

/// Profile of a cluster's retained members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMix {
    pub member_count: usize,
    pub has_primary: bool,
    pub distinct_publishers: usize,
    /// Members whose type is not `Social`
    pub non_social: usize,
    pub types: BTreeSet<SourceType>,
    /// Publish time of the oldest member
    pub earliest: Option<DateTime<Utc>>,
}

impl SourceMix {
    pub fn from_members(members: &[SourceItem]) -> Self {
        let publishers: HashSet<&str> = members.iter().map(|m| m.publisher.as_str()).collect();
        Self {
            member_count: members.len(),
            has_primary: members.iter().any(SourceItem::is_primary),
            distinct_publishers: publishers.len(),
            non_social: members
                .iter()
                .filter(|m| m.source_type != SourceType::Social)
                .count(),
            types: members.iter().map(|m| m.source_type).collect(),
            earliest: members.iter().map(|m| m.published_at).min(),
        }
    }

    /// Whether every member has exactly this type.
    pub fn is_only(&self, source_type: SourceType) -> bool {
        self.types.len() == 1 && self.types.contains(&source_type)
    }

    pub fn has_type(&self, source_type: SourceType) -> bool {
        self.types.contains(&source_type)
    }
}

/// Credibility from the source mix, 0-5.
///
/// A `Primary` member is worth 3; otherwise corroboration across trade and
/// mainstream outlets, or any two non-social members, is worth 2. A second
/// publisher adds 1. Influencer-only coverage never exceeds 2.
pub fn credibility(mix: &SourceMix) -> u8 {
    let mut c: u8 = 0;
    if mix.has_primary {
        c += 3;
    } else if (mix.has_type(SourceType::Trade) && mix.has_type(SourceType::Mainstream))
        || mix.non_social >= 2
    {
        c += 2;
    }
    if mix.distinct_publishers >= 2 {
        c += 1;
    }
    if mix.is_only(SourceType::Influencer) {
        c = c.min(2);
    }
    c.min(MAX_CREDIBILITY)
}

/// Relevance of a subdomain to the briefing.
pub fn relevance(subdomain: Subdomain) -> u8 {
    match subdomain {
        Subdomain::Security => 5,
        Subdomain::Regulation | Subdomain::Apps => 4,
        Subdomain::Infrastructure | Subdomain::Models | Subdomain::Business => 3,
    }
}

/// Compiled scoring tables.
pub struct Scorer {
    impact: Vec<Regex>,
    urgency: Vec<Regex>,
}

impl Scorer {
    pub fn new(rules: &ScoringRules) -> Result<Self, EngineError> {
        Ok(Self {
            impact: compile_all(&rules.impact_patterns)?,
            urgency: compile_all(&rules.urgency_patterns)?,
        })
    }

    pub fn impact(&self, subdomain: Subdomain, text: &str) -> u8 {
        if self.impact.iter().any(|p| p.is_match(text)) {
            4
        } else if subdomain == Subdomain::Regulation {
            3
        } else {
            2
        }
    }

    pub fn time_sensitivity(&self, subdomain: Subdomain, text: &str) -> u8 {
        if subdomain == Subdomain::Security || self.urgency.iter().any(|p| p.is_match(text)) {
            4
        } else if subdomain == Subdomain::Regulation {
            3
        } else {
            2
        }
    }

    /// Score a cluster from its subdomain, joined member text, and mix.
    pub fn score(&self, subdomain: Subdomain, text: &str, mix: &SourceMix) -> Score {
        Score::new(
            relevance(subdomain),
            self.impact(subdomain, text),
            BASE_NOVELTY,
            credibility(mix),
            self.time_sensitivity(subdomain, text),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_types::MAX_TOTAL;
    use chrono::{Duration, TimeZone};

    fn member(id: &str, publisher: &str, source_type: SourceType) -> SourceItem {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        SourceItem::new(id, publisher, format!("title {id}"), source_type, at)
    }

    fn scorer() -> Scorer {
        Scorer::new(&ScoringRules::default()).unwrap()
    }

    #[test]
    fn test_credibility_single_primary() {
        let mix = SourceMix::from_members(&[member("1", "OpenAI Blog", SourceType::Primary)]);
        assert_eq!(credibility(&mix), 3);
    }

    #[test]
    fn test_credibility_trade_and_mainstream() {
        let mix = SourceMix::from_members(&[
            member("1", "The Information", SourceType::Trade),
            member("2", "Reuters", SourceType::Mainstream),
        ]);
        assert_eq!(credibility(&mix), 3);
    }

    #[test]
    fn test_credibility_primary_with_second_publisher() {
        let mix = SourceMix::from_members(&[
            member("1", "OpenAI Blog", SourceType::Primary),
            member("2", "Reuters", SourceType::Mainstream),
        ]);
        assert_eq!(credibility(&mix), 4);
    }

    #[test]
    fn test_credibility_influencer_only_capped() {
        let mix = SourceMix::from_members(&[
            member("1", "Hype Weekly", SourceType::Influencer),
            member("2", "Hype Weekly", SourceType::Influencer),
            member("3", "Hype Weekly", SourceType::Influencer),
        ]);
        assert!(mix.is_only(SourceType::Influencer));
        assert_eq!(credibility(&mix), 2);

        let multi = SourceMix::from_members(&[
            member("1", "Hype Weekly", SourceType::Influencer),
            member("2", "Model Gossip", SourceType::Influencer),
        ]);
        assert_eq!(credibility(&multi), 2);
    }

    #[test]
    fn test_credibility_social_only() {
        let mix = SourceMix::from_members(&[
            member("1", "user_a", SourceType::Social),
            member("2", "user_b", SourceType::Social),
        ]);
        // only the publisher bonus applies
        assert_eq!(credibility(&mix), 1);
        assert_eq!(mix.non_social, 0);
    }

    #[test]
    fn test_credibility_single_trade() {
        let mix = SourceMix::from_members(&[member("1", "The Verge", SourceType::Trade)]);
        assert_eq!(credibility(&mix), 0);
    }

    #[test]
    fn test_mix_earliest() {
        let a = member("1", "A", SourceType::Trade);
        let mut b = member("2", "B", SourceType::Trade);
        b.published_at = a.published_at - Duration::hours(3);
        let mix = SourceMix::from_members(&[a, b.clone()]);
        assert_eq!(mix.earliest, Some(b.published_at));
        assert_eq!(mix.member_count, 2);
    }

    #[test]
    fn test_relevance_table() {
        assert_eq!(relevance(Subdomain::Security), 5);
        assert_eq!(relevance(Subdomain::Regulation), 4);
        assert_eq!(relevance(Subdomain::Apps), 4);
        assert_eq!(relevance(Subdomain::Infrastructure), 3);
        assert_eq!(relevance(Subdomain::Models), 3);
        assert_eq!(relevance(Subdomain::Business), 3);
    }

    #[test]
    fn test_impact_language() {
        let s = scorer();
        assert_eq!(s.impact(Subdomain::Business, "API pricing drops by half"), 4);
        assert_eq!(s.impact(Subdomain::Models, "New flagship model"), 4);
        assert_eq!(s.impact(Subdomain::Models, "State-of-the-art results"), 4);
        assert_eq!(s.impact(Subdomain::Regulation, "Court hearing set"), 3);
        assert_eq!(s.impact(Subdomain::Apps, "Minor update"), 2);
    }

    #[test]
    fn test_time_sensitivity() {
        let s = scorer();
        assert_eq!(s.time_sensitivity(Subdomain::Security, "anything"), 4);
        assert_eq!(s.time_sensitivity(Subdomain::Apps, "ChatGPT outage hits users"), 4);
        assert_eq!(s.time_sensitivity(Subdomain::Regulation, "Senate vote"), 3);
        assert_eq!(s.time_sensitivity(Subdomain::Models, "Model release"), 2);
    }

    #[test]
    fn test_score_total_is_clamped_sum() {
        let s = scorer();
        let mix = SourceMix::from_members(&[
            member("1", "Vendor", SourceType::Primary),
            member("2", "Reuters", SourceType::Mainstream),
        ]);
        let score = s.score(Subdomain::Security, "exploit outage", &mix);
        assert_eq!(score.relevance, 5);
        assert_eq!(score.impact, 4);
        assert_eq!(score.novelty, BASE_NOVELTY);
        assert_eq!(score.credibility, 4);
        assert_eq!(score.time_sensitivity, 4);
        assert_eq!(u16::from(score.total), score.subscore_sum().min(u16::from(MAX_TOTAL)));
        assert_eq!(score.total, 19);
    }

    #[test]
    fn test_invalid_scoring_pattern() {
        let rules = ScoringRules {
            impact_patterns: vec!["[".to_string()],
            ..ScoringRules::default()
        };
        assert!(Scorer::new(&rules).is_err());
    }
}
