use std::{env, time::Duration};

use crate::error::{PlannerError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 1200;

/// Process-wide settings, read once at startup and never mutated afterwards.
///
/// Passed by value into [`crate::TravelPlanner`]; nothing reads the
/// environment after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    api_key: Option<String>,
    model: String,
    temperature: f32,
    base_url: String,
    max_tokens: u32,
    timeout: Option<Duration>,
    max_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
            max_retries: 0,
        }
    }
}

impl Config {
    /// Load settings from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        config.api_key = get("OPENAI_API_KEY");

        if let Some(model) = get("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(raw) = get("OPENAI_TEMPERATURE") {
            config.temperature = parse_temperature(&raw)?;
        }
        if let Some(raw) = get("TRAVEL_BUDDY_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| {
                PlannerError::Config(format!(
                    "TRAVEL_BUDDY_TIMEOUT_SECS must be a whole number of seconds, got `{raw}`"
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = get("TRAVEL_BUDDY_MAX_RETRIES") {
            config.max_retries = raw.parse::<usize>().map_err(|_| {
                PlannerError::Config(format!(
                    "TRAVEL_BUDDY_MAX_RETRIES must be a non-negative integer, got `{raw}`"
                ))
            })?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

pub(crate) fn parse_temperature(raw: &str) -> Result<f32> {
    let value = raw.trim().parse::<f32>().map_err(|_| {
        PlannerError::Config(format!("OPENAI_TEMPERATURE must be a number, got `{raw}`"))
    })?;

    if !value.is_finite() || !(0.0..=2.0).contains(&value) {
        return Err(PlannerError::Config(format!(
            "temperature must be between 0.0 and 2.0, got {value}"
        )));
    }

    Ok(value)
}
