//! Text normalization: alias folding, subdomain classification, entity and
//! keyword extraction.
//!
//! Every operation is total: empty or malformed text yields the fallbacks
//! (`Other` entity, default subdomain, empty keyword list) instead of an
//! error. Only building a [`Normalizer`] from bad rule tables can fail.

use std::collections::HashSet;

use regex::{NoExpand, Regex, RegexBuilder};
use tracing::debug;

use briefing_types::{SourceItem, Subdomain};

use crate::error::EngineError;
use crate::rules::NormalizerRules;

/// Entity sentinel for items no dictionary entry matches.
pub const OTHER_ENTITY: &str = "Other";

/// Capitalized phrase of 1-4 words; words are alphanumerics plus `&` and `-`.
const PHRASE_PATTERN: &str = r"\b[A-Z][A-Za-z0-9&\-]*(?:[ \t]+[A-Z][A-Za-z0-9&\-]*){0,3}";

const MIN_PHRASE_LEN: usize = 3;
const MAX_PHRASE_LEN: usize = 40;

/// Clustering signature of one source item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Primary entity or [`OTHER_ENTITY`]
    pub entity: String,
    pub subdomain: Subdomain,
    /// Clustering tokens, ordered, capped
    pub keywords: Vec<String>,
}

impl Fingerprint {
    /// Whether the entity is a dictionary hit.
    pub fn has_known_entity(&self) -> bool {
        self.entity != OTHER_ENTITY
    }
}

/// Compile a table pattern case-insensitively.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, EngineError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| EngineError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

pub(crate) fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, EngineError> {
    patterns.iter().map(|p| compile_pattern(p)).collect()
}

/// Compiled normalizer.
///
/// Owns its tables, so independent instances can run side by side.
pub struct Normalizer {
    aliases: Vec<(Regex, String)>,
    subdomains: Vec<(Subdomain, Vec<Regex>)>,
    default_subdomain: Subdomain,
    entities: Vec<(String, Vec<Regex>)>,
    phrase: Regex,
    stopwords: HashSet<String>,
    filler_words: HashSet<String>,
    narrative_verbs: HashSet<String>,
    min_keyword_len: usize,
    min_cluster_token_len: usize,
    max_keywords: usize,
    max_fingerprint_keywords: usize,
    max_entities: usize,
}

impl Normalizer {
    /// Compile the rule tables.
    pub fn new(rules: &NormalizerRules) -> Result<Self, EngineError> {
        let aliases = rules
            .aliases
            .iter()
            .map(|rule| Ok((compile_pattern(&rule.pattern)?, rule.canonical.clone())))
            .collect::<Result<Vec<_>, EngineError>>()?;

        let subdomains = rules
            .subdomains
            .iter()
            .map(|rule| Ok((rule.subdomain, compile_all(&rule.patterns)?)))
            .collect::<Result<Vec<_>, EngineError>>()?;

        let entities = rules
            .entities
            .iter()
            .map(|rule| Ok((rule.name.clone(), compile_all(&rule.patterns)?)))
            .collect::<Result<Vec<_>, EngineError>>()?;

        let phrase = Regex::new(PHRASE_PATTERN).map_err(|source| EngineError::Pattern {
            pattern: PHRASE_PATTERN.to_string(),
            source,
        })?;

        let lower_set = |words: &[String]| -> HashSet<String> {
            words.iter().map(|w| w.to_lowercase()).collect()
        };

        debug!(
            aliases = aliases.len(),
            subdomain_groups = subdomains.len(),
            entities = entities.len(),
            "Normalizer compiled"
        );

        Ok(Self {
            aliases,
            subdomains,
            default_subdomain: rules.default_subdomain,
            entities,
            phrase,
            stopwords: lower_set(&rules.stopwords),
            filler_words: lower_set(&rules.filler_words),
            narrative_verbs: lower_set(&rules.narrative_verbs),
            min_keyword_len: rules.min_keyword_len,
            min_cluster_token_len: rules.min_cluster_token_len,
            max_keywords: rules.max_keywords,
            max_fingerprint_keywords: rules.max_fingerprint_keywords,
            max_entities: rules.max_entities,
        })
    }

    /// Apply every alias rule in order to the running text.
    pub fn fold_aliases(&self, text: &str) -> String {
        let mut folded = text.to_string();
        for (pattern, canonical) in &self.aliases {
            if pattern.is_match(&folded) {
                folded = pattern
                    .replace_all(&folded, NoExpand(canonical))
                    .into_owned();
            }
        }
        folded
    }

    /// First matching subdomain group, or the default.
    pub fn classify(&self, text: &str) -> Subdomain {
        self.subdomains
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(text)))
            .map(|(subdomain, _)| *subdomain)
            .unwrap_or(self.default_subdomain)
    }

    /// First dictionary entity present in the text, or [`OTHER_ENTITY`].
    pub fn primary_entity(&self, text: &str) -> String {
        self.entities
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(text)))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| OTHER_ENTITY.to_string())
    }

    /// Dictionary hits followed by capitalized phrases, capped.
    ///
    /// Never empty: falls back to the primary entity.
    pub fn extract_entities(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for (name, patterns) in &self.entities {
            if patterns.iter().any(|p| p.is_match(text)) && !contains_ignore_case(&found, name) {
                found.push(name.clone());
            }
        }

        for m in self.phrase.find_iter(text) {
            if found.len() >= self.max_entities {
                break;
            }
            if let Some(phrase) = self.clean_phrase(m.as_str()) {
                if !contains_ignore_case(&found, &phrase) {
                    found.push(phrase);
                }
            }
        }

        found.truncate(self.max_entities);
        if found.is_empty() {
            found.push(self.primary_entity(text));
        }
        found
    }

    /// User-facing keywords.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        self.tokens(text, self.min_keyword_len, self.max_keywords)
    }

    /// Looser token set used only for clustering similarity.
    pub fn clustering_tokens(&self, text: &str) -> Vec<String> {
        self.tokens(text, self.min_cluster_token_len, self.max_fingerprint_keywords)
    }

    /// Fingerprint an item from its alias-folded title and summary.
    pub fn fingerprint(&self, item: &SourceItem) -> Fingerprint {
        let text = self.fold_aliases(&item.combined_text());
        Fingerprint {
            entity: self.primary_entity(&text),
            subdomain: self.classify(&text),
            keywords: self.clustering_tokens(&text),
        }
    }

    fn tokens(&self, text: &str, min_len: usize, cap: usize) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for token in cleaned.split_whitespace() {
            if out.len() >= cap {
                break;
            }
            if token.chars().count() < min_len || self.stopwords.contains(token) {
                continue;
            }
            if seen.insert(token) {
                out.push(token.to_string());
            }
        }
        out
    }

    /// Strip leading filler words and reject narrative phrases.
    fn clean_phrase(&self, raw: &str) -> Option<String> {
        let words: Vec<&str> = raw
            .split_whitespace()
            .skip_while(|w| self.filler_words.contains(&w.to_lowercase()))
            .collect();
        if words.is_empty()
            || words
                .iter()
                .any(|w| self.narrative_verbs.contains(&w.to_lowercase()))
        {
            return None;
        }
        let phrase = words.join(" ");
        let len = phrase.chars().count();
        (MIN_PHRASE_LEN..=MAX_PHRASE_LEN)
            .contains(&len)
            .then_some(phrase)
    }
}

fn contains_ignore_case(list: &[String], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    list.iter().any(|e| e.to_lowercase() == candidate)
}
