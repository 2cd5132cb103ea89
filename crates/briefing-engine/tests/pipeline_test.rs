//! End-to-end runs of the briefing engine over small fixed batches.
//!
//! Each scenario builds a batch of source items relative to a fixed window
//! start and checks where the resulting topics land.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use briefing_engine::{BriefingEngine, EngineConfig};
use briefing_types::{
    Confidence, RunContext, RunResult, SourceItem, SourceType, Subdomain, TopicCandidate,
    MAX_TOTAL,
};

const DATE: &str = "2025-03-01";

fn window_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
}

fn at_minutes(minutes: i64) -> DateTime<Utc> {
    window_start() + Duration::minutes(minutes)
}

fn item(
    id: &str,
    publisher: &str,
    title: &str,
    source_type: SourceType,
    minutes: i64,
) -> SourceItem {
    SourceItem::new(id, publisher, title, source_type, at_minutes(minutes))
        .with_url(format!("https://news.example/{id}"))
}

fn run(items: &[SourceItem]) -> RunResult {
    run_with(items, RunContext::new(window_start(), DATE))
}

fn run_with(items: &[SourceItem], ctx: RunContext) -> RunResult {
    let engine = BriefingEngine::new(EngineConfig::default()).unwrap();
    engine.run(items, &ctx).unwrap()
}

fn all_topics(result: &RunResult) -> impl Iterator<Item = &TopicCandidate> {
    result
        .briefing_topics
        .iter()
        .chain(result.queued_topics.iter())
}

fn assert_run_invariants(result: &RunResult, candidates: usize) {
    assert!(result.briefing_topics.len() <= 5);
    assert!(result.queued_topics.len() <= 20);

    let mut per_subdomain: HashMap<Subdomain, usize> = HashMap::new();
    for topic in &result.briefing_topics {
        *per_subdomain.entry(topic.subdomain).or_default() += 1;
    }
    assert!(per_subdomain.values().all(|&n| n <= 2));

    let briefing_ids: HashSet<&str> =
        result.briefing_topics.iter().map(|t| t.id.as_str()).collect();
    assert!(result
        .queued_topics
        .iter()
        .all(|t| !briefing_ids.contains(t.id.as_str())));

    for topic in all_topics(result) {
        let sum = topic.score.subscore_sum().min(u16::from(MAX_TOTAL));
        assert_eq!(u16::from(topic.score.total), sum);
    }

    assert_eq!(
        result.excluded_reasons.total() as usize,
        candidates - result.briefing_topics.len()
    );
}

#[test]
fn test_single_primary_reaches_briefing() {
    let items = [item(
        "p1",
        "OpenAI Blog",
        "OpenAI releases GPT-5 model",
        SourceType::Primary,
        120,
    )
    .with_summary("GPT-5 is available to all users today. Pricing follows next week.")];

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert_eq!(result.briefing_topics.len(), 1);

    let topic = &result.briefing_topics[0];
    assert_eq!(topic.id, "ai-2025-03-01-01");
    assert_eq!(topic.score.credibility, 3);
    assert_eq!(topic.confidence, Confidence::Med);
    assert_eq!(topic.briefing_reason, "Primary in window");
    assert_eq!(topic.subdomain, Subdomain::Models);
    assert_eq!(topic.intel, "OpenAI Blog: GPT-5 is available to all users today.");
    assert_eq!(topic.timeline.len(), 3);
}

#[test]
fn test_trade_and_mainstream_agree() {
    let items = [
        item(
            "t1",
            "The Information",
            "Nvidia unveils Blackwell GPU for data centers",
            SourceType::Trade,
            60,
        ),
        item(
            "m1",
            "Reuters",
            "Nvidia shows new Blackwell GPU for data centers",
            SourceType::Mainstream,
            90,
        ),
    ];

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert_eq!(result.briefing_topics.len(), 1);

    let topic = &result.briefing_topics[0];
    assert_eq!(topic.subdomain, Subdomain::Infrastructure);
    assert_eq!(topic.score.credibility, 3);
    assert_eq!(topic.confidence, Confidence::Med);
    assert_eq!(topic.briefing_reason, "2 sources agree");
    assert_eq!(topic.sources.len(), 2);
    // most recent member supplies the title
    assert_eq!(topic.title, "Nvidia shows new Blackwell GPU for data centers");
}

#[test]
fn test_influencer_only_is_queued() {
    let items = [
        item("i1", "Hype Weekly", "Mistral model rumor spreads", SourceType::Influencer, 10),
        item("i2", "Hype Weekly", "Mistral model rumor grows", SourceType::Influencer, 20),
        item("i3", "Hype Weekly", "Mistral model rumor confirmed?", SourceType::Influencer, 30),
    ];

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert!(result.briefing_topics.is_empty());
    assert_eq!(result.queued_topics.len(), 1);

    let topic = &result.queued_topics[0];
    assert_eq!(topic.score.credibility, 2);
    assert!(topic.confidence <= Confidence::Med);
    assert_eq!(topic.briefing_reason, "Influencer-only coverage");
    assert_eq!(result.excluded_reasons.credibility, 1);
}

#[test]
fn test_outside_window_excluded() {
    let items = [
        item("a1", "Apple Newsroom", "Apple acquires AI startup", SourceType::Primary, -180),
        item("a2", "Bloomberg", "Apple acquires AI startup", SourceType::Mainstream, 60),
    ];

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert!(result.briefing_topics.is_empty());
    assert!(result.queued_topics.is_empty());
    assert_eq!(result.excluded_reasons.outside_window, 1);
}

#[test]
fn test_social_only_excluded() {
    let items = [
        item("s1", "user_a", "Grok jailbreak trending", SourceType::Social, 60),
        item("s2", "user_b", "Grok jailbreak trending", SourceType::Social, 120),
    ];

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert!(result.briefing_topics.is_empty());
    assert!(result.queued_topics.is_empty());
    assert_eq!(result.excluded_reasons.social_only, 1);
}

#[test]
fn test_contradiction_blocks_high_confidence() {
    let items = [
        item("r1", "Reuters", "Meta plans layoffs, report says", SourceType::Mainstream, 30),
        item("d1", "Meta Newsroom", "Meta denies layoffs report", SourceType::Primary, 90),
    ];

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert_eq!(result.briefing_topics.len(), 1);

    let topic = &result.briefing_topics[0];
    assert_eq!(topic.score.credibility, 4);
    assert_eq!(
        topic.contradictions,
        vec!["Meta Newsroom disputes: Meta denies layoffs report".to_string()]
    );
    assert_eq!(topic.confidence, Confidence::Med);
}

#[test]
fn test_briefing_caps_hold() {
    let stories = [
        ("OpenAI Blog", "OpenAI releases GPT-5 model"),
        ("Anthropic News", "Anthropic releases Claude model"),
        ("Google Blog", "Google releases Gemini model"),
        ("Meta AI Blog", "Meta releases Llama model"),
        ("Nvidia Blog", "Nvidia releases Nemotron model"),
        ("Amazon News", "Amazon releases Nova model"),
        ("Mistral News", "Mistral releases Large model"),
        ("xAI News", "xAI releases Grok model"),
    ];
    let items: Vec<SourceItem> = stories
        .iter()
        .enumerate()
        .map(|(i, (publisher, title))| {
            item(&format!("p{i}"), publisher, title, SourceType::Primary, 10 * i as i64 + 10)
        })
        .collect();

    let result = run(&items);
    assert_run_invariants(&result, stories.len());
    assert_eq!(result.briefing_topics.len(), 2);
    assert_eq!(result.excluded_reasons.diversity, 6);
    assert!(result
        .queued_topics
        .iter()
        .all(|t| t.briefing_reason == "Diversity cap"));
}

fn single_trade(i: usize, publisher: &str) -> SourceItem {
    item(
        &format!("x{i}"),
        publisher,
        &format!("Lab{i} item{i} thing{i}"),
        SourceType::Trade,
        60 + i as i64,
    )
}

#[test]
fn test_flagged_publisher_reinjected() {
    let items = [single_trade(0, "Plain Wire"), single_trade(1, "Flagged Wire")];

    let overrides: HashMap<String, bool> = [("Flagged Wire".to_string(), true)].into();
    let ctx = RunContext::new(window_start(), DATE).with_always_show(overrides);
    let result = run_with(&items, ctx);

    assert_run_invariants(&result, 2);
    assert!(result.briefing_topics.is_empty());
    assert_eq!(result.queued_topics.len(), 1);
    assert_eq!(result.excluded_reasons.source_count, 2);

    let queued = &result.queued_topics[0];
    assert_eq!(queued.sources[0].publisher, "Flagged Wire");
    assert_eq!(queued.briefing_reason, "Publisher override");

    // without the flag both are held back
    let result = run(&items);
    assert!(result.queued_topics.is_empty());
    assert_eq!(result.excluded_reasons.source_count, 2);
}

#[test]
fn test_publisher_overrides_capped() {
    let items: Vec<SourceItem> = (0..8).map(|i| single_trade(i, "Flagged Wire")).collect();

    let overrides: HashMap<String, bool> = [("Flagged Wire".to_string(), true)].into();
    let ctx = RunContext::new(window_start(), DATE).with_always_show(overrides);
    let result = run_with(&items, ctx);

    assert_run_invariants(&result, 8);
    assert_eq!(result.queued_topics.len(), 5);
    assert!(result
        .queued_topics
        .iter()
        .all(|t| t.briefing_reason == "Publisher override"));
    assert_eq!(result.excluded_reasons.source_count, 8);
}

fn wide_story(minutes: &[i64]) -> Vec<SourceItem> {
    minutes
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            item(
                &format!("w{i}"),
                &format!("Trade Desk {i}"),
                "OpenAI releases GPT-5 model to all users",
                SourceType::Trade,
                m,
            )
        })
        .collect()
}

#[test]
fn test_large_cluster_keeps_recent_members() {
    // the two oldest members predate the window but are not retained
    let items = wide_story(&[-120, -60, 10, 20, 30, 40, 50]);

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert_eq!(result.excluded_reasons.outside_window, 0);
    assert_eq!(result.briefing_topics.len(), 1);

    let topic = &result.briefing_topics[0];
    assert_eq!(topic.sources.len(), 5);
    assert_eq!(topic.briefing_reason, "5 sources agree");
    let ids: HashSet<&str> = topic.sources.iter().map(|s| s.id.as_str()).collect();
    assert!(!ids.contains("w0") && !ids.contains("w1"));
}

#[test]
fn test_large_cluster_window_uses_retained_members() {
    // the oldest retained member predates the window
    let items = wide_story(&[-180, -120, -60, 20, 30, 40, 50]);

    let result = run(&items);
    assert_run_invariants(&result, 1);
    assert!(result.briefing_topics.is_empty());
    assert!(result.queued_topics.is_empty());
    assert_eq!(result.excluded_reasons.outside_window, 1);
}

#[test]
fn test_runs_are_deterministic() {
    let items = [
        item("t1", "The Verge", "Microsoft Copilot adds agent features", SourceType::Trade, 15),
        item("m1", "CNBC", "Microsoft Copilot agent features arrive", SourceType::Mainstream, 45),
        item("p1", "EU Commission", "EU AI Act enforcement begins", SourceType::Primary, 75),
        item("s1", "user_c", "Chips are back", SourceType::Social, 80),
        item("r1", "Ars Technica", "Anthropic Claude jailbreak found", SourceType::Trade, 95),
    ];

    let first = run(&items);
    let second = run(&items);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_every_topic_shape_is_valid() {
    let items = [
        item("t1", "The Verge", "Microsoft Copilot adds agent features", SourceType::Trade, 15)
            .with_summary(
                "Copilot can now take actions in Word and Excel on behalf of users, \
                 the company said on Tuesday.",
            ),
        item("m1", "CNBC", "Microsoft Copilot agent features arrive", SourceType::Mainstream, 45),
        item(
            "p1",
            "EU Commission",
            "European Union AI Act enforcement begins for general purpose model providers \
             across member states",
            SourceType::Primary,
            75,
        ),
        item("r1", "Ars Technica", "Anthropic Claude jailbreak found", SourceType::Trade, 95),
    ];

    let result = run(&items);
    for topic in all_topics(&result) {
        briefing_engine::validate_topic(topic).unwrap();
        assert!(topic.title.chars().count() <= 60);
        assert!(!topic.entities.is_empty());
    }
}
