//! Output shape checks.
//!
//! Every topic in a run result is checked before the result leaves the
//! engine. The first violation aborts the run; there is no partial output.

use briefing_types::{RunResult, TopicCandidate};

use crate::error::{EngineError, Violation};

pub const MAX_TITLE_LEN: usize = 60;
pub const MAX_INTEL_LEN: usize = 140;
pub const MAX_CONTEXT_LEN: usize = 80;
pub const EFFECT_COUNT: usize = 2;
pub const MAX_EFFECT_LEN: usize = 110;
pub const MAX_CONTRADICTIONS: usize = 3;
pub const MAX_CONTRADICTION_LEN: usize = 120;
pub const MAX_ENTITIES: usize = 8;
pub const MAX_ENTITY_LEN: usize = 40;
pub const MAX_KEYWORDS: usize = 8;
pub const MIN_TIMELINE: usize = 3;
pub const MAX_TIMELINE: usize = 6;
pub const MAX_SOURCES: usize = 5;

pub const MAX_BRIEFING: usize = 5;
pub const MAX_PER_SUBDOMAIN: usize = 2;
pub const MAX_QUEUE: usize = 20;
pub const MAX_OVERRIDES: usize = 5;

fn text(field: &str, value: &str, limit: usize) -> Result<(), Violation> {
    if value.trim().is_empty() {
        return Err(Violation::Empty {
            field: field.to_string(),
        });
    }
    let actual = value.chars().count();
    if actual > limit {
        return Err(Violation::TooLong {
            field: field.to_string(),
            actual,
            limit,
        });
    }
    Ok(())
}

fn count(field: &str, actual: usize, min: usize, max: usize) -> Result<(), Violation> {
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(Violation::Count {
            field: field.to_string(),
            actual,
            min,
            max,
        })
    }
}

fn check_topic(topic: &TopicCandidate) -> Result<(), Violation> {
    text("title", &topic.title, MAX_TITLE_LEN)?;
    text("intel", &topic.intel, MAX_INTEL_LEN)?;
    text("context.what", &topic.context.what, MAX_CONTEXT_LEN)?;
    text("context.why", &topic.context.why, MAX_CONTEXT_LEN)?;
    text("context.who", &topic.context.who, MAX_CONTEXT_LEN)?;

    count(
        "second_order_effects",
        topic.second_order_effects.len(),
        EFFECT_COUNT,
        EFFECT_COUNT,
    )?;
    for effect in &topic.second_order_effects {
        text("second_order_effects", effect, MAX_EFFECT_LEN)?;
    }

    count("contradictions", topic.contradictions.len(), 0, MAX_CONTRADICTIONS)?;
    for contradiction in &topic.contradictions {
        text("contradictions", contradiction, MAX_CONTRADICTION_LEN)?;
    }

    count("entities", topic.entities.len(), 1, MAX_ENTITIES)?;
    for entity in &topic.entities {
        text("entities", entity, MAX_ENTITY_LEN)?;
    }

    count("keywords", topic.keywords.len(), 0, MAX_KEYWORDS)?;

    count("timeline", topic.timeline.len(), MIN_TIMELINE, MAX_TIMELINE)?;
    if let Some(index) = topic.timeline.iter().position(|e| e.source_ids.is_empty()) {
        return Err(Violation::UnbackedTimelineEntry { index });
    }

    count("sources", topic.sources.len(), 1, MAX_SOURCES)
}

/// Check one topic.
pub fn validate_topic(topic: &TopicCandidate) -> Result<(), EngineError> {
    check_topic(topic).map_err(|violation| EngineError::Validation {
        topic_id: topic.id.clone(),
        violation,
    })
}

/// Check every topic in both lists.
pub fn validate_result(result: &RunResult) -> Result<(), EngineError> {
    result
        .briefing_topics
        .iter()
        .chain(result.queued_topics.iter())
        .try_for_each(validate_topic)
}
