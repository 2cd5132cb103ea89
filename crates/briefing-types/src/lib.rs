//! # briefing-types
//!
//! Shared domain types for the daily AI briefing.
//!
//! This crate defines the data structures exchanged between the ingestion
//! stage, the topic engine, and the CLI:
//! - Source items: already-fetched feed entries
//! - Topic candidates: scored, gated editorial units
//! - Run context and run result
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use briefing_types::{SourceItem, SourceType};
//! use chrono::Utc;
//!
//! let item = SourceItem::new("1", "OpenAI Blog", "New model", SourceType::Primary, Utc::now());
//! assert!(item.is_primary());
//! ```

pub mod config;
pub mod error;
pub mod run;
pub mod source;
pub mod topic;

pub use config::Settings;
pub use error::BriefingError;
pub use run::{ExclusionCounts, ExclusionReason, RunContext, RunResult};
pub use source::{SourceItem, SourceType};
pub use topic::{
    Confidence, Score, SourceRef, Subdomain, TimelineEntry, TopicCandidate, TopicContext, TopicId,
    MAX_CREDIBILITY, MAX_IMPACT, MAX_NOVELTY, MAX_RELEVANCE, MAX_TIME_SENSITIVITY, MAX_TOTAL,
};
