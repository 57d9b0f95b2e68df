use std::env;
use std::str::FromStr;
use std::time::Duration;

use hero_core::{DailyGate, HeroError, RulesConfig};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not set")]
    Missing { name: &'static str },
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

impl From<ConfigError> for HeroError {
    fn from(err: ConfigError) -> Self {
        HeroError::Config(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub authority_url: Option<String>,
    pub request_timeout: Duration,
    pub max_url_length: usize,
    pub utc_offset_minutes: i32,
    pub rules: RulesConfig,
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(default),
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = RulesConfig::default();
        let timeout_seconds: u64 = parsed(&lookup, "HERO_REQUEST_TIMEOUT_SECONDS", 30)?;
        if timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                name: "HERO_REQUEST_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        let quiz_length = parsed(&lookup, "HERO_QUIZ_LENGTH", defaults.quiz_length)?;
        if quiz_length == 0 {
            return Err(ConfigError::Invalid {
                name: "HERO_QUIZ_LENGTH",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            authority_url: lookup("HERO_AUTHORITY_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            request_timeout: Duration::from_secs(timeout_seconds),
            max_url_length: parsed(&lookup, "HERO_MAX_URL_LENGTH", 8000)?,
            utc_offset_minutes: parsed(&lookup, "HERO_UTC_OFFSET_MINUTES", 420)?,
            rules: RulesConfig {
                quiz_length,
                points_per_correct: parsed(&lookup, "HERO_POINTS_PER_CORRECT", defaults.points_per_correct)?,
                mystery_box_cost: parsed(&lookup, "HERO_MYSTERY_BOX_COST", defaults.mystery_box_cost)?,
                ..defaults
            },
        })
    }

    pub fn authority_url(&self) -> Result<&str, ConfigError> {
        self.authority_url
            .as_deref()
            .ok_or(ConfigError::Missing { name: "HERO_AUTHORITY_URL" })
    }

    pub fn daily_gate(&self) -> Result<DailyGate, HeroError> {
        DailyGate::from_offset_minutes(self.utc_offset_minutes)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            authority_url: None,
            request_timeout: Duration::from_secs(30),
            max_url_length: 8000,
            utc_offset_minutes: 420,
            rules: RulesConfig::default(),
        }
    }
}
