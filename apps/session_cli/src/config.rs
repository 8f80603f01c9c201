use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "session.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl OutputFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "pretty" => Some(OutputFormat::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub event_queue_capacity: usize,
    pub mail_recipient: Option<String>,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            event_queue_capacity: 64,
            mail_recipient: None,
            output: OutputFormat::Json,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    log_filter: Option<String>,
    event_queue_capacity: Option<usize>,
    mail_recipient: Option<String>,
    output: Option<OutputFormat>,
}

/// Defaults, then the config file (if present), then the environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    } else if config_path.is_some() {
        anyhow::bail!("config file '{}' does not exist", path.display());
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.event_queue_capacity {
        settings.event_queue_capacity = v.max(1);
    }
    if let Some(v) = file_cfg.mail_recipient {
        settings.mail_recipient = Some(v);
    }
    if let Some(v) = file_cfg.output {
        settings.output = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SESSION_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = var("APP__EVENT_QUEUE_CAPACITY") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.event_queue_capacity = parsed.max(1);
        }
    }

    if let Some(v) = var("APP__MAIL_RECIPIENT") {
        settings.mail_recipient = Some(v);
    }

    if let Some(v) = var("APP__OUTPUT") {
        if let Some(output) = OutputFormat::parse(&v) {
            settings.output = output;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
