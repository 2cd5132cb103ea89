//! # briefing-engine
//!
//! Topic formation for the daily AI briefing.
//!
//! Takes already-fetched source items and produces a small ranked briefing,
//! a review queue, and counters explaining every exclusion. The model is
//! deterministic and rule based: the same batch and run context always give
//! the same result.
//!
//! ## Pipeline
//! - Normalizer: alias folding, subdomain classification, entity and keyword extraction
//! - Clustering: `(entity, subdomain)` buckets with greedy Jaccard merging
//! - Synthesis: title, intel line, context, effects, contradictions, timeline
//! - Scoring: credibility plus rubric subscores, clamped total
//! - Eligibility: ordered trust gates and discrete confidence
//! - Selection: ranking, diversity caps, queue, publisher overrides
//! - Validation: output limits enforced before anything is returned

pub mod clustering;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod rules;
pub mod scoring;
pub mod selection;
pub mod similarity;
pub mod synthesis;
pub mod validation;

pub use clustering::{cluster_items, Cluster};
pub use config::{ClusteringConfig, EngineConfig, SelectionConfig};
pub use eligibility::{confidence, evaluate, GateOutcome, Verdict};
pub use engine::BriefingEngine;
pub use error::{EngineError, Violation};
pub use normalizer::{Fingerprint, Normalizer, OTHER_ENTITY};
pub use rules::{AliasRule, EntityRule, NormalizerRules, ScoringRules, SubdomainRule};
pub use scoring::{credibility, relevance, Scorer, SourceMix};
pub use selection::{rank_order, reinject_overrides, select, EvaluatedTopic, Selection};
pub use similarity::jaccard;
pub use synthesis::Synthesizer;
pub use validation::{validate_result, validate_topic};
