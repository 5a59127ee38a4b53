//! Environment configuration

use anyhow::{bail, Context};
use chrono::Duration;
use study_core::{get_algorithm, AnswerPolicy, MatchScoring, MatchingMode, Quality, SessionConfig};

/// Server configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PostgreSQL when set, in-memory store otherwise.
    pub database_url: Option<String>,
    pub study: StudyConfig,
}

/// Study defaults handed to every new session.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyConfig {
    /// Scheduler name, resolved through `get_algorithm`.
    pub algorithm: String,
    pub default_limit: usize,
    pub match_batch_size: usize,
    pub choice_option_count: usize,
    pub answer_matching: MatchingMode,
    pub fuzzy_threshold: f64,
    pub match_scoring: MatchScoring,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            algorithm: "sm2".to_string(),
            default_limit: 20,
            match_batch_size: 10,
            choice_option_count: 4,
            answer_matching: MatchingMode::CaseInsensitive,
            fuzzy_threshold: 0.8,
            match_scoring: MatchScoring::Neutral,
        }
    }
}

impl StudyConfig {
    pub fn answer_policy(&self) -> AnswerPolicy {
        AnswerPolicy {
            mode: self.answer_matching,
            fuzzy_threshold: self.fuzzy_threshold,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            limit: self.default_limit,
            match_batch: self.match_batch_size,
            option_count: self.choice_option_count,
            answer_policy: self.answer_policy(),
            match_scoring: self.match_scoring,
            match_pending_delay: Duration::seconds(1),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = StudyConfig::default();

        let answer_matching = match lookup("ANSWER_MATCHING") {
            Some(raw) => MatchingMode::from_str(raw.trim())
                .with_context(|| format!("ANSWER_MATCHING: unknown mode {raw:?}"))?,
            None => defaults.answer_matching,
        };

        let fuzzy_threshold = parse_or(&lookup, "FUZZY_THRESHOLD", defaults.fuzzy_threshold)?;
        if !(0.0..=1.0).contains(&fuzzy_threshold) {
            bail!("FUZZY_THRESHOLD must be between 0 and 1, got {fuzzy_threshold}");
        }

        let match_scoring = match lookup("MATCH_REVIEW_QUALITY") {
            Some(raw) => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("MATCH_REVIEW_QUALITY: not a number {raw:?}"))?;
                let quality = Quality::parse(value).context("MATCH_REVIEW_QUALITY")?;
                // A matched pair is a correct answer.
                if !quality.is_pass() {
                    bail!("MATCH_REVIEW_QUALITY must be a passing quality (3 or 5), got {value}");
                }
                MatchScoring::Review(quality)
            }
            None => MatchScoring::Neutral,
        };

        let algorithm = lookup("ALGORITHM")
            .map(|raw| raw.trim().to_lowercase())
            .unwrap_or(defaults.algorithm);
        if get_algorithm(&algorithm).is_none() {
            bail!("ALGORITHM: unknown algorithm {algorithm:?}");
        }

        let study = StudyConfig {
            algorithm,
            default_limit: positive(&lookup, "STUDY_DEFAULT_LIMIT", defaults.default_limit)?,
            match_batch_size: positive(&lookup, "MATCH_BATCH_SIZE", defaults.match_batch_size)?,
            choice_option_count: positive(&lookup, "CHOICE_OPTION_COUNT", defaults.choice_option_count)?,
            answer_matching,
            fuzzy_threshold,
            match_scoring,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            study,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}: invalid value {raw:?}")),
        None => Ok(default),
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> anyhow::Result<usize> {
    let value = parse_or(lookup, key, default)?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}
