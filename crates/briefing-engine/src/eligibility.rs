//! Trust gates and confidence.
//!
//! Gates run in a fixed order and the first failure decides both the
//! exclusion counter and the label shown on the candidate. Influencer-only
//! coverage is routed to the queue; every other failure is held back and
//! only reaches the queue through a publisher override.

use chrono::{DateTime, Utc};

use briefing_types::{Confidence, ExclusionReason, Score, SourceType};

use crate::scoring::SourceMix;

pub const LABEL_PRIMARY: &str = "Primary in window";
pub const LABEL_OUTSIDE_WINDOW: &str = "Outside window";
pub const LABEL_SOCIAL_ONLY: &str = "Social-only coverage";
pub const LABEL_SINGLE_SOURCE: &str = "Single non-primary source";
pub const LABEL_INFLUENCER_ONLY: &str = "Influencer-only coverage";
pub const LABEL_LOW_CREDIBILITY: &str = "Low credibility";
pub const LABEL_LOW_RELEVANCE: &str = "Low relevance";
pub const LABEL_FEW_INDEPENDENT: &str = "Too few independent sources";
pub const LABEL_DIVERSITY_CAP: &str = "Diversity cap";
pub const LABEL_PUBLISHER_OVERRIDE: &str = "Publisher override";

/// Label for eligible multi-source candidates without a primary member.
pub fn agreement_label(distinct_publishers: usize) -> String {
    format!("{distinct_publishers} sources agree")
}

/// Discrete confidence from credibility, source mix, and contradictions.
pub fn confidence(mix: &SourceMix, credibility: u8, contradictions: usize) -> Confidence {
    let base = if mix.member_count <= 1 {
        if mix.has_primary {
            Confidence::Med
        } else {
            Confidence::Low
        }
    } else if (mix.has_primary || mix.distinct_publishers >= 2)
        && contradictions == 0
        && credibility >= 4
    {
        Confidence::High
    } else if credibility >= 3 {
        Confidence::Med
    } else {
        Confidence::Low
    };

    if base == Confidence::High && mix.is_only(SourceType::Influencer) {
        Confidence::Med
    } else {
        base
    }
}

/// Gate result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    /// Counted as excluded but still shown in the queue
    Queued(ExclusionReason),
    Rejected(ExclusionReason),
}

/// Verdict plus the human-readable reason carried on the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub verdict: Verdict,
    pub label: String,
}

impl GateOutcome {
    fn eligible(label: String) -> Self {
        Self {
            verdict: Verdict::Eligible,
            label,
        }
    }

    fn queued(reason: ExclusionReason, label: &str) -> Self {
        Self {
            verdict: Verdict::Queued(reason),
            label: label.to_string(),
        }
    }

    fn rejected(reason: ExclusionReason, label: &str) -> Self {
        Self {
            verdict: Verdict::Rejected(reason),
            label: label.to_string(),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.verdict == Verdict::Eligible
    }

    /// Exclusion reason for rejected candidates.
    pub fn exclusion(&self) -> Option<ExclusionReason> {
        match self.verdict {
            Verdict::Eligible => None,
            Verdict::Queued(reason) | Verdict::Rejected(reason) => Some(reason),
        }
    }

    /// Whether the candidate may appear in the queue without an override.
    pub fn is_queueable(&self) -> bool {
        matches!(self.verdict, Verdict::Eligible | Verdict::Queued(_))
    }

    /// Whether a publisher override can bring the candidate back.
    pub fn is_overridable(&self) -> bool {
        matches!(self.verdict, Verdict::Rejected(reason) if reason.is_trust_gate())
    }
}

/// Run the gates in order; the first failure wins.
pub fn evaluate(mix: &SourceMix, score: &Score, window_start: DateTime<Utc>) -> GateOutcome {
    use ExclusionReason::*;

    if mix.earliest.map_or(true, |earliest| earliest < window_start) {
        return GateOutcome::rejected(OutsideWindow, LABEL_OUTSIDE_WINDOW);
    }
    if mix.is_only(SourceType::Social) {
        return GateOutcome::rejected(SocialOnly, LABEL_SOCIAL_ONLY);
    }
    if mix.member_count < 2 && !mix.has_primary {
        return GateOutcome::rejected(SourceCount, LABEL_SINGLE_SOURCE);
    }
    if mix.is_only(SourceType::Influencer) {
        return GateOutcome::queued(Credibility, LABEL_INFLUENCER_ONLY);
    }
    if score.credibility <= 1 {
        return GateOutcome::rejected(Credibility, LABEL_LOW_CREDIBILITY);
    }
    if score.relevance <= 1 {
        return GateOutcome::rejected(Relevance, LABEL_LOW_RELEVANCE);
    }
    if mix.member_count >= 2 {
        if score.credibility < 3 {
            return GateOutcome::rejected(Credibility, LABEL_LOW_CREDIBILITY);
        }
        if score.relevance < 2 {
            return GateOutcome::rejected(Relevance, LABEL_LOW_RELEVANCE);
        }
        if !mix.has_primary && mix.non_social < 2 {
            return GateOutcome::rejected(SourceCount, LABEL_FEW_INDEPENDENT);
        }
    }

    if mix.has_primary {
        GateOutcome::eligible(LABEL_PRIMARY.to_string())
    } else {
        GateOutcome::eligible(agreement_label(mix.distinct_publishers))
    }
}
