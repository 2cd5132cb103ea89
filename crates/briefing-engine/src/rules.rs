//! Pattern tables driving normalization and scoring.
//!
//! Tables are plain data so they can be loaded from a rules file, replaced
//! in tests, or extended without touching control flow. Order is
//! significant everywhere: alias rules apply in sequence, subdomain groups
//! are first-match-wins, and dictionary entities are reported in table order.
//!
//! All patterns are compiled case-insensitively.

use serde::{Deserialize, Serialize};

use briefing_types::Subdomain;

/// Rewrites matches of `pattern` to `canonical`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub pattern: String,
    pub canonical: String,
}

/// Patterns that classify text into a subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainRule {
    pub subdomain: Subdomain,
    pub patterns: Vec<String>,
}

/// A canonical entity and the patterns that signal it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRule {
    pub name: String,
    pub patterns: Vec<String>,
}

/// Tables and limits for the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerRules {
    /// Subdomain used when no group matches
    #[serde(default = "default_subdomain")]
    pub default_subdomain: Subdomain,

    /// Minimum length of a user-facing keyword
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,

    /// Minimum length of a clustering token
    #[serde(default = "default_min_cluster_token_len")]
    pub min_cluster_token_len: usize,

    /// Cap on user-facing keywords
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Cap on fingerprint (clustering) keywords
    #[serde(default = "default_max_keywords")]
    pub max_fingerprint_keywords: usize,

    /// Cap on extracted entities
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,

    /// Tokens never used as keywords
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Words stripped from the front of capitalized phrases
    #[serde(default = "default_filler_words")]
    pub filler_words: Vec<String>,

    /// Phrases containing these words are not entities
    #[serde(default = "default_narrative_verbs")]
    pub narrative_verbs: Vec<String>,

    /// Ordered alias folding rules
    #[serde(default = "default_aliases")]
    pub aliases: Vec<AliasRule>,

    /// Ordered subdomain groups; first match wins
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<SubdomainRule>,

    /// Canonical entity dictionary
    #[serde(default = "default_entities")]
    pub entities: Vec<EntityRule>,
}

impl Default for NormalizerRules {
    fn default() -> Self {
        Self {
            default_subdomain: default_subdomain(),
            min_keyword_len: default_min_keyword_len(),
            min_cluster_token_len: default_min_cluster_token_len(),
            max_keywords: default_max_keywords(),
            max_fingerprint_keywords: default_max_keywords(),
            max_entities: default_max_entities(),
            stopwords: default_stopwords(),
            filler_words: default_filler_words(),
            narrative_verbs: default_narrative_verbs(),
            aliases: default_aliases(),
            subdomains: default_subdomains(),
            entities: default_entities(),
        }
    }
}

/// Text signals used by the rubric subscores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Pricing, exploit, flagship, and state-of-the-art language
    #[serde(default = "default_impact_patterns")]
    pub impact_patterns: Vec<String>,

    /// Outage and incident language
    #[serde(default = "default_urgency_patterns")]
    pub urgency_patterns: Vec<String>,

    /// Denial and dispute language, used to record contradictions
    #[serde(default = "default_dispute_patterns")]
    pub dispute_patterns: Vec<String>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            impact_patterns: default_impact_patterns(),
            urgency_patterns: default_urgency_patterns(),
            dispute_patterns: default_dispute_patterns(),
        }
    }
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn alias(pattern: &str, canonical: &str) -> AliasRule {
    AliasRule {
        pattern: pattern.to_string(),
        canonical: canonical.to_string(),
    }
}

fn group(subdomain: Subdomain, patterns: &[&str]) -> SubdomainRule {
    SubdomainRule {
        subdomain,
        patterns: strings(patterns),
    }
}

fn entity(name: &str, patterns: &[&str]) -> EntityRule {
    EntityRule {
        name: name.to_string(),
        patterns: strings(patterns),
    }
}

fn default_aliases() -> Vec<AliasRule> {
    vec![
        alias(r"\bopen\s?ai\b", "OpenAI"),
        alias(r"\bchat\s?gpt\b", "ChatGPT"),
        alias(r"\banthropic\s+pbc\b", "Anthropic"),
        alias(r"\bgoogle\s+deep\s?mind\b", "DeepMind"),
        alias(r"\bdeep\s?mind\b", "DeepMind"),
        alias(r"\bmeta\s+ai\b", "Meta"),
        alias(r"\bmeta\s+platforms\b", "Meta"),
        alias(r"\bfacebook\b", "Meta"),
        alias(r"\bmicrosoft\s+corp(oration)?\b\.?", "Microsoft"),
        alias(r"\bnvidia\s+corp(oration)?\b\.?", "Nvidia"),
        alias(r"\bmistral\s+ai\b", "Mistral"),
        alias(r"\bx\.ai\b", "xAI"),
        alias(r"\bhugging\s?face\b", "Hugging Face"),
        alias(r"\beuropean\s+union\b", "EU"),
    ]
}

fn default_subdomains() -> Vec<SubdomainRule> {
    vec![
        group(
            Subdomain::Security,
            &[
                r"\bsecurity\b",
                r"\bvulnerab",
                r"\bexploit",
                r"\bjailbreak",
                r"\bprompt[- ]injection\b",
                r"\bbreach",
                r"\bmalware\b",
                r"\bransomware\b",
                r"\bphishing\b",
                r"\bcve-\d{4}",
                r"\bbackdoor",
                r"\bleak(s|ed)?\b",
            ],
        ),
        group(
            Subdomain::Regulation,
            &[
                r"\bregulat",
                r"\bai act\b",
                r"\blegislat",
                r"\blawsuit",
                r"\bsued\b",
                r"\bcourt\b",
                r"\bftc\b",
                r"\bantitrust\b",
                r"\bcopyright\b",
                r"\bexecutive order\b",
                r"\bcompliance\b",
                r"\bsenate\b",
                r"\bcongress\b",
                r"\bban(s|ned)?\b",
            ],
        ),
        group(
            Subdomain::Infrastructure,
            &[
                r"\bgpus?\b",
                r"\bchips?\b",
                r"\bsemiconductor",
                r"\bdata ?cent(er|re)s?\b",
                r"\btpus?\b",
                r"\bsupercomputer",
                r"\bh100s?\b",
                r"\bb200s?\b",
                r"\bcompute\b",
                r"\bhardware\b",
                r"\bpower grid\b",
            ],
        ),
        group(
            Subdomain::Apps,
            &[
                r"\bapps?\b",
                r"\bassistant\b",
                r"\bcopilot\b",
                r"\bproductivity\b",
                r"\bplugins?\b",
                r"\bbrowser\b",
                r"\bextension\b",
                r"\bworkspace\b",
                r"\bintegrations?\b",
                r"\bfeatures?\b",
            ],
        ),
        group(
            Subdomain::Business,
            &[
                r"\bfunding\b",
                r"\braise[sd]?\b",
                r"\bvaluation\b",
                r"\bacqui(re|res|red|sition)\b",
                r"\brevenue\b",
                r"\bipo\b",
                r"\binvest",
                r"\blayoffs?\b",
                r"\bpartnership\b",
                r"\bearnings\b",
                r"\bstocks?\b",
                r"\bmarket share\b",
            ],
        ),
        group(
            Subdomain::Models,
            &[
                r"\bmodels?\b",
                r"\bllms?\b",
                r"\bweights\b",
                r"\bbenchmark",
                r"\bopen[- ]source\b",
                r"\bgpt-?\d",
                r"\bclaude\b",
                r"\bgemini\b",
                r"\bllama\b",
                r"\bparameters?\b",
                r"\breleases?\b",
                r"\blaunch(es|ed)?\b",
            ],
        ),
    ]
}

fn default_subdomain() -> Subdomain {
    Subdomain::Business
}

fn default_entities() -> Vec<EntityRule> {
    vec![
        entity("OpenAI", &[r"\bopenai\b", r"\bchatgpt\b", r"\bgpt-?\d"]),
        entity("Anthropic", &[r"\banthropic\b", r"\bclaude\b"]),
        entity("Google", &[r"\bgoogle\b", r"\bgemini\b"]),
        entity("DeepMind", &[r"\bdeepmind\b"]),
        entity("Meta", &[r"\bmeta\b", r"\bllama\b"]),
        entity("Microsoft", &[r"\bmicrosoft\b", r"\bcopilot\b", r"\bazure\b"]),
        entity("Nvidia", &[r"\bnvidia\b"]),
        entity("Apple", &[r"\bapple\b"]),
        entity("Amazon", &[r"\bamazon\b", r"\baws\b"]),
        entity("Mistral", &[r"\bmistral\b"]),
        entity("xAI", &[r"\bxai\b", r"\bgrok\b"]),
        entity("Hugging Face", &[r"\bhugging face\b"]),
        entity("EU", &[r"\beu\b", r"\beuropean commission\b"]),
    ]
}

fn default_stopwords() -> Vec<String> {
    strings(&[
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "has", "had", "was",
        "one", "out", "via", "how", "why", "who", "now", "per", "may", "any", "get", "its",
        "new", "use", "our", "his", "her", "she", "him", "off", "too", "yet", "did", "does",
        "with", "that", "this", "from", "have", "about", "into", "more", "their", "after",
        "over", "also", "just", "than", "them", "they", "were", "been", "what", "when",
        "which", "while", "would", "could", "should", "there", "these", "those", "other",
        "some", "such", "only", "your", "will", "said", "says", "being", "here", "where",
        "then", "very", "most", "much", "many", "each", "both", "before", "because", "today",
        "week", "year", "years", "according", "report", "reports", "reported", "amp",
    ])
}

fn default_filler_words() -> Vec<String> {
    strings(&[
        "The", "A", "An", "This", "That", "These", "Those", "New", "How", "Why", "What",
        "When", "Where", "Who", "Here", "There", "It", "Its", "In", "On", "At", "For", "With",
        "From", "By", "And", "But", "Or", "As", "If", "Is", "Are", "We", "Our", "I", "You",
        "After", "Before", "Today", "Yesterday", "Breaking", "Update", "Exclusive", "Report",
        "Says", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ])
}

fn default_narrative_verbs() -> Vec<String> {
    strings(&["Which", "Read", "Article", "Enables", "Built", "Unveils"])
}

fn default_min_keyword_len() -> usize {
    4
}

fn default_min_cluster_token_len() -> usize {
    3
}

fn default_max_keywords() -> usize {
    8
}

fn default_max_entities() -> usize {
    8
}

fn default_impact_patterns() -> Vec<String> {
    strings(&[
        r"\bpric(e|es|ed|ing)\b",
        r"\bexploit",
        r"\bflagship\b",
        r"\bstate[- ]of[- ]the[- ]art\b",
        r"\bsota\b",
    ])
}

fn default_urgency_patterns() -> Vec<String> {
    strings(&[
        r"\boutages?\b",
        r"\bincidents?\b",
        r"\bdowntime\b",
        r"\bdegraded\b",
    ])
}

fn default_dispute_patterns() -> Vec<String> {
    strings(&[
        r"\bden(y|ies|ied)\b",
        r"\bdisput(e|es|ed)\b",
        r"\brefut(e|es|ed)\b",
        r"\bdebunk",
        r"\bnot true\b",
        r"\bcontradict",
    ])
}
