//! Ranking, briefing selection under diversity caps, the queue, and
//! publisher-override reinjection.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use briefing_types::{
    ExclusionCounts, ExclusionReason, RunContext, RunResult, Subdomain, TopicCandidate,
};

use crate::config::SelectionConfig;
use crate::eligibility::{GateOutcome, LABEL_DIVERSITY_CAP, LABEL_PUBLISHER_OVERRIDE};

/// A scored candidate with its gate outcome.
#[derive(Debug, Clone)]
pub struct EvaluatedTopic {
    pub candidate: TopicCandidate,
    pub outcome: GateOutcome,
}

/// Deterministic rank order: total, credibility, recency, member count
/// (all descending), then id ascending.
pub fn rank_order(a: &TopicCandidate, b: &TopicCandidate) -> Ordering {
    b.score
        .total
        .cmp(&a.score.total)
        .then_with(|| b.score.credibility.cmp(&a.score.credibility))
        .then_with(|| b.latest_published().cmp(&a.latest_published()))
        .then_with(|| b.sources.len().cmp(&a.sources.len()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Selection output before override reinjection.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub briefing: Vec<TopicCandidate>,
    pub queue: Vec<TopicCandidate>,
    /// Trust-gate failures kept out of the queue, in rank order
    pub held_back: Vec<EvaluatedTopic>,
    pub excluded: ExclusionCounts,
}

impl Selection {
    pub fn into_result(self) -> RunResult {
        RunResult {
            briefing_topics: self.briefing,
            queued_topics: self.queue,
            excluded_reasons: self.excluded,
        }
    }
}

/// Rank candidates and fill the briefing and queue.
///
/// Every candidate left out of the briefing increments exactly one counter;
/// eligible candidates that lose to the caps count as `diversity`. The queue
/// holds those plus influencer-only coverage. Other trust-gate failures are
/// held back for [`reinject_overrides`].
pub fn select(mut evaluated: Vec<EvaluatedTopic>, config: &SelectionConfig) -> Selection {
    evaluated.sort_by(|a, b| rank_order(&a.candidate, &b.candidate));

    let mut selection = Selection::default();
    let mut per_subdomain: HashMap<Subdomain, usize> = HashMap::new();
    let mut queueable: Vec<TopicCandidate> = Vec::new();

    for mut topic in evaluated {
        topic.candidate.briefing_reason = topic.outcome.label.clone();

        let Some(reason) = topic.outcome.exclusion() else {
            let held = per_subdomain.entry(topic.candidate.subdomain).or_insert(0);
            if selection.briefing.len() < config.max_briefing
                && *held < config.max_per_subdomain
            {
                *held += 1;
                selection.briefing.push(topic.candidate);
            } else {
                selection.excluded.record(ExclusionReason::Diversity);
                topic.candidate.briefing_reason = LABEL_DIVERSITY_CAP.to_string();
                queueable.push(topic.candidate);
            }
            continue;
        };

        selection.excluded.record(reason);
        if topic.outcome.is_queueable() {
            queueable.push(topic.candidate);
        } else if topic.outcome.is_overridable() {
            selection.held_back.push(topic);
        }
    }

    let dropped = queueable.len().saturating_sub(config.max_queue);
    queueable.truncate(config.max_queue);
    selection.queue = queueable;

    debug!(
        briefing = selection.briefing.len(),
        queue = selection.queue.len(),
        dropped,
        held_back = selection.held_back.len(),
        "Selection complete"
    );
    selection
}

/// Pull held-back trust-gate failures backed by an `always_show` publisher
/// into the queue.
///
/// Candidates are taken in rank order, skipping any whose title already
/// appears in either list or among earlier picks. When the queue is full its
/// lowest-ranked entries make room. Counters are left as they are. Returns
/// the number reinjected.
pub fn reinject_overrides(
    selection: &mut Selection,
    ctx: &RunContext,
    config: &SelectionConfig,
) -> usize {
    let mut titles: HashSet<String> = selection
        .briefing
        .iter()
        .chain(selection.queue.iter())
        .map(|t| t.title.to_lowercase())
        .collect();

    let mut picks: Vec<TopicCandidate> = Vec::new();
    for topic in &selection.held_back {
        if picks.len() >= config.max_overrides {
            break;
        }
        let flagged = topic
            .candidate
            .sources
            .iter()
            .any(|s| ctx.is_always_show(&s.publisher));
        if !flagged || !titles.insert(topic.candidate.title.to_lowercase()) {
            continue;
        }
        let mut candidate = topic.candidate.clone();
        candidate.briefing_reason = LABEL_PUBLISHER_OVERRIDE.to_string();
        picks.push(candidate);
    }

    if picks.is_empty() {
        return 0;
    }

    let room = config.max_queue.saturating_sub(picks.len());
    if selection.queue.len() > room {
        debug!(
            displaced = selection.queue.len() - room,
            "Queue tail displaced by publisher overrides"
        );
        selection.queue.truncate(room);
    }

    let reinjected: HashSet<&str> = picks.iter().map(|t| t.id.as_str()).collect();
    selection
        .held_back
        .retain(|t| !reinjected.contains(t.candidate.id.as_str()));

    let count = picks.len();
    selection.queue.extend(picks);
    count
}
