//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rules::{NormalizerRules, ScoringRules};
use crate::validation::{
    MAX_BRIEFING, MAX_ENTITIES, MAX_KEYWORDS, MAX_OVERRIDES, MAX_PER_SUBDOMAIN, MAX_QUEUE,
    MAX_SOURCES,
};

/// Master configuration for a briefing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix for topic identifiers (`<prefix>-<date>-<NN>`)
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Clustering settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Selection settings
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Normalizer tables
    #[serde(default)]
    pub normalizer: NormalizerRules,

    /// Scoring tables
    #[serde(default)]
    pub scoring: ScoringRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            clustering: ClusteringConfig::default(),
            selection: SelectionConfig::default(),
            normalizer: NormalizerRules::default(),
            scoring: ScoringRules::default(),
        }
    }
}

fn default_id_prefix() -> String {
    "ai".to_string()
}

impl EngineConfig {
    /// Parse a TOML rules file. Missing sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(s).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if self.id_prefix.trim().is_empty() {
            return invalid("id_prefix must not be empty".to_string());
        }

        let c = &self.clustering;
        for (name, value) in [
            ("known_entity_threshold", c.known_entity_threshold),
            ("unknown_entity_threshold", c.unknown_entity_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be 0.0-1.0, got {value}"));
            }
        }
        if c.max_cluster_keywords == 0 {
            return invalid("max_cluster_keywords must be > 0".to_string());
        }
        if !(1..=MAX_SOURCES).contains(&c.max_cluster_members) {
            return invalid(format!(
                "max_cluster_members must be 1-{MAX_SOURCES}, got {}",
                c.max_cluster_members
            ));
        }

        let s = &self.selection;
        for (name, value, max) in [
            ("max_briefing", s.max_briefing, MAX_BRIEFING),
            ("max_per_subdomain", s.max_per_subdomain, MAX_PER_SUBDOMAIN),
            ("max_queue", s.max_queue, MAX_QUEUE),
        ] {
            if !(1..=max).contains(&value) {
                return invalid(format!("{name} must be 1-{max}, got {value}"));
            }
        }
        if s.max_overrides > MAX_OVERRIDES {
            return invalid(format!("max_overrides cannot exceed {MAX_OVERRIDES}"));
        }
        if s.max_overrides > s.max_queue {
            return invalid(format!(
                "max_overrides ({}) cannot exceed max_queue ({})",
                s.max_overrides, s.max_queue
            ));
        }

        let n = &self.normalizer;
        if !(1..=MAX_ENTITIES).contains(&n.max_entities) {
            return invalid(format!("max_entities must be 1-{MAX_ENTITIES}"));
        }
        for (name, value) in [
            ("max_keywords", n.max_keywords),
            ("max_fingerprint_keywords", n.max_fingerprint_keywords),
        ] {
            if value > MAX_KEYWORDS {
                return invalid(format!("{name} cannot exceed {MAX_KEYWORDS}"));
            }
        }
        if n.min_keyword_len == 0 || n.min_cluster_token_len == 0 {
            return invalid("token length floors must be > 0".to_string());
        }
        let mut seen = Vec::new();
        for rule in &n.subdomains {
            if seen.contains(&rule.subdomain) {
                return invalid(format!("subdomain {} listed twice", rule.subdomain));
            }
            seen.push(rule.subdomain);
        }

        Ok(())
    }
}

/// Clustering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Jaccard threshold when the bucket entity is known
    #[serde(default = "default_known_entity_threshold")]
    pub known_entity_threshold: f32,

    /// Jaccard threshold when the bucket entity is `Other`
    #[serde(default = "default_unknown_entity_threshold")]
    pub unknown_entity_threshold: f32,

    /// Cap on a cluster's accumulated keyword set
    #[serde(default = "default_max_cluster_keywords")]
    pub max_cluster_keywords: usize,

    /// Most recent members kept per cluster
    #[serde(default = "default_max_cluster_members")]
    pub max_cluster_members: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            known_entity_threshold: default_known_entity_threshold(),
            unknown_entity_threshold: default_unknown_entity_threshold(),
            max_cluster_keywords: default_max_cluster_keywords(),
            max_cluster_members: default_max_cluster_members(),
        }
    }
}

fn default_known_entity_threshold() -> f32 {
    0.10
}
fn default_unknown_entity_threshold() -> f32 {
    0.25
}
fn default_max_cluster_keywords() -> usize {
    12
}
fn default_max_cluster_members() -> usize {
    5
}

/// Selection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Briefing size
    #[serde(default = "default_max_briefing")]
    pub max_briefing: usize,

    /// Briefing topics allowed per subdomain
    #[serde(default = "default_max_per_subdomain")]
    pub max_per_subdomain: usize,

    /// Queue size
    #[serde(default = "default_max_queue")]
    pub max_queue: usize,

    /// Publisher-override topics reinjected into the queue
    #[serde(default = "default_max_overrides")]
    pub max_overrides: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_briefing: default_max_briefing(),
            max_per_subdomain: default_max_per_subdomain(),
            max_queue: default_max_queue(),
            max_overrides: default_max_overrides(),
        }
    }
}

fn default_max_briefing() -> usize {
    5
}
fn default_max_per_subdomain() -> usize {
    2
}
fn default_max_queue() -> usize {
    20
}
fn default_max_overrides() -> usize {
    5
}
