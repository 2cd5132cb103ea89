//! Run orchestration: cluster, synthesize, score, gate, select, validate.

use tracing::{debug, info, instrument};

use briefing_types::{RunContext, RunResult, SourceItem};

use crate::clustering::cluster_items;
use crate::config::EngineConfig;
use crate::eligibility::{confidence, evaluate};
use crate::error::EngineError;
use crate::normalizer::Normalizer;
use crate::scoring::{Scorer, SourceMix};
use crate::selection::{reinject_overrides, select, EvaluatedTopic};
use crate::synthesis::{cluster_text, topic_id, Synthesizer};
use crate::validation::validate_result;

/// Turns a batch of source items into a briefing, a queue, and exclusion
/// counters.
///
/// All rule tables are compiled once at construction and owned by the
/// engine, so a run is a pure function of its inputs.
///
/// # Example
/// ```
/// use briefing_engine::{BriefingEngine, EngineConfig};
/// use briefing_types::{RunContext, SourceItem, SourceType};
/// use chrono::{Duration, Utc};
///
/// let engine = BriefingEngine::new(EngineConfig::default()).unwrap();
/// let now = Utc::now();
/// let items = vec![SourceItem::new(
///     "1",
///     "OpenAI Blog",
///     "OpenAI releases a new model",
///     SourceType::Primary,
///     now,
/// )];
/// let ctx = RunContext::new(now - Duration::hours(24), "2025-03-01");
///
/// let result = engine.run(&items, &ctx).unwrap();
/// assert_eq!(result.briefing_topics.len(), 1);
/// ```
pub struct BriefingEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    scorer: Scorer,
    synthesizer: Synthesizer,
}

impl BriefingEngine {
    /// Validate the configuration and compile its tables.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let normalizer = Normalizer::new(&config.normalizer)?;
        let scorer = Scorer::new(&config.scoring)?;
        let synthesizer = Synthesizer::new(&config.scoring)?;
        Ok(Self {
            config,
            normalizer,
            scorer,
            synthesizer,
        })
    }

    /// Run the pipeline over one batch.
    ///
    /// Fails only when a produced topic violates the output limits; no
    /// partial result is returned in that case.
    #[instrument(skip(self, items, ctx), fields(items = items.len(), date = %ctx.date_label))]
    pub fn run(&self, items: &[SourceItem], ctx: &RunContext) -> Result<RunResult, EngineError> {
        let clusters = cluster_items(&self.normalizer, items, &self.config.clustering);

        let mut evaluated = Vec::with_capacity(clusters.len());
        for (idx, cluster) in clusters.iter().enumerate() {
            let id = topic_id(&self.config.id_prefix, &ctx.date_label, idx + 1);
            let Some(mut candidate) = self.synthesizer.synthesize(id, cluster, &self.normalizer)
            else {
                continue;
            };

            let mix = SourceMix::from_members(&cluster.members);
            let text = cluster_text(&self.normalizer, &cluster.members);
            candidate.score = self.scorer.score(cluster.subdomain, &text, &mix);
            candidate.confidence = confidence(
                &mix,
                candidate.score.credibility,
                candidate.contradictions.len(),
            );

            let outcome = evaluate(&mix, &candidate.score, ctx.window_start);
            debug!(
                topic_id = %candidate.id,
                subdomain = %candidate.subdomain,
                total = candidate.score.total,
                credibility = candidate.score.credibility,
                confidence = %candidate.confidence,
                reason = %outcome.label,
                "Candidate evaluated"
            );
            evaluated.push(EvaluatedTopic { candidate, outcome });
        }

        let candidates = evaluated.len();
        let mut selection = select(evaluated, &self.config.selection);
        let reinjected = reinject_overrides(&mut selection, ctx, &self.config.selection);
        let result = selection.into_result();

        validate_result(&result)?;

        info!(
            candidates,
            briefing = result.briefing_topics.len(),
            queued = result.queued_topics.len(),
            reinjected,
            excluded = result.excluded_reasons.total(),
            "Briefing run complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.selection.max_briefing = 0;
        assert!(matches!(
            BriefingEngine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_batch() {
        let engine = BriefingEngine::new(EngineConfig::default()).unwrap();
        let ctx = RunContext::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(), "2025-03-01");
        let result = engine.run(&[], &ctx).unwrap();
        assert!(result.briefing_topics.is_empty());
        assert!(result.queued_topics.is_empty());
        assert_eq!(result.excluded_reasons.total(), 0);
    }

    #[test]
    fn test_custom_prefix_in_ids() {
        let config = EngineConfig {
            id_prefix: "brief".to_string(),
            ..EngineConfig::default()
        };
        let engine = BriefingEngine::new(config).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let items = [SourceItem::new(
            "1",
            "Anthropic News",
            "Anthropic releases Claude model",
            briefing_types::SourceType::Primary,
            at,
        )];
        let ctx = RunContext::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(), "2025-03-01");
        let result = engine.run(&items, &ctx).unwrap();
        assert_eq!(result.briefing_topics[0].id, "brief-2025-03-01-01");
    }
}
