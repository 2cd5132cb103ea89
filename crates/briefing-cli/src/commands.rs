//! Command implementations for the briefing tool.
//!
//! Handles:
//! - run: load settings and rules, read items, run the engine, write the result
//! - rules: print the default engine rules

use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use briefing_engine::{BriefingEngine, EngineConfig};
use briefing_types::{RunContext, RunResult, Settings, SourceItem};

/// Per-invocation options for `briefing run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: String,
    pub window_start: Option<String>,
    pub date: Option<String>,
    pub overrides: Option<String>,
    pub rules: Option<String>,
    pub output: Option<String>,
}

/// Load layered settings and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    id_prefix_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(prefix) = id_prefix_override {
        settings.id_prefix = Some(prefix.to_string());
    }
    settings
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    Ok(settings)
}

/// Initialize logging; `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Engine configuration from a rules file, or the defaults.
///
/// A prefix set in settings (file, env or flag) wins over the file's
/// `id_prefix`.
pub fn load_engine_config(rules_path: Option<&str>, settings: &Settings) -> Result<EngineConfig> {
    let mut config = match rules_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read rules file {path}"))?;
            EngineConfig::from_toml_str(&raw)
                .with_context(|| format!("Invalid rules file {path}"))?
        }
        None => EngineConfig::default(),
    };
    if let Some(prefix) = &settings.id_prefix {
        config.id_prefix = prefix.clone();
    }
    Ok(config)
}

fn parse_window_start(
    raw: Option<&str>,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    match raw {
        Some(value) => Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Invalid --window-start {value:?}, expected RFC 3339"))?
            .with_timezone(&Utc)),
        None => Ok(now - Duration::hours(i64::from(settings.window_hours))),
    }
}

fn read_items(path: &str) -> Result<Vec<SourceItem>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read items file {path}"))?;
    SourceItem::parse_batch(&raw).with_context(|| format!("Invalid items file {path}"))
}

fn read_overrides(path: &str) -> Result<HashMap<String, bool>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read overrides file {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid overrides file {path}"))
}

/// Run the engine over an items file and write the JSON result.
pub fn run_briefing(settings: &Settings, opts: &RunOptions) -> Result<RunResult> {
    let now = Utc::now();

    let rules_path = opts.rules.as_deref().or(settings.rules_path.as_deref());
    let config = load_engine_config(rules_path, settings)?;
    let engine = BriefingEngine::new(config).context("Failed to build engine")?;

    let window_start = parse_window_start(opts.window_start.as_deref(), settings, now)?;
    let date_label = opts
        .date
        .clone()
        .unwrap_or_else(|| now.format("%Y-%m-%d").to_string());

    let always_show = match opts.overrides.as_deref() {
        Some(path) => read_overrides(path)?,
        None => HashMap::new(),
    };

    let items = read_items(&opts.input)?;
    info!(
        items = items.len(),
        window_start = %window_start,
        date = %date_label,
        overrides = always_show.len(),
        "Starting briefing run"
    );

    let ctx = RunContext::new(window_start, date_label).with_always_show(always_show);
    let result = engine.run(&items, &ctx).context("Briefing run failed")?;

    let rendered = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    match opts.output.as_deref() {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write {path}"))?;
            info!("Wrote result to {}", path);
        }
        None => println!("{rendered}"),
    }

    Ok(result)
}

/// Default engine rules rendered as TOML.
pub fn render_default_rules() -> Result<String> {
    EngineConfig::default()
        .to_toml_string()
        .context("Failed to render default rules")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_start_default() {
        let settings = Settings::default();
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 6, 0, 0).unwrap();
        let start = parse_window_start(None, &settings, now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_window_start_parsed() {
        let settings = Settings::default();
        let now = Utc::now();
        let start = parse_window_start(Some("2025-03-01T02:00:00+02:00"), &settings, now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert!(parse_window_start(Some("yesterday"), &settings, now).is_err());
    }

    #[test]
    fn test_settings_prefix_applied_to_engine() {
        let settings = Settings {
            id_prefix: Some("brief".to_string()),
            ..Settings::default()
        };
        let config = load_engine_config(None, &settings).unwrap();
        assert_eq!(config.id_prefix, "brief");

        let config = load_engine_config(None, &Settings::default()).unwrap();
        assert_eq!(config.id_prefix, "ai");
    }

    #[test]
    fn test_default_rules_render() {
        let rendered = render_default_rules().unwrap();
        assert!(rendered.contains("[clustering]"));
        assert!(EngineConfig::from_toml_str(&rendered).is_ok());
    }
}
