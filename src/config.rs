//! Process configuration, read once at startup from the environment.

use anyhow::Context;
use figment::{Figment, providers::Env};
use fundu::DurationParser;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

#[derive(Deserialize, custom_debug_derive::Debug, Clone)]
pub struct Config {
    /// Base level for this crate's log events (`trace`..`error`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Secret used for the model API.
    #[debug(skip)]
    pub openai_api_key: String,

    /// Shared secret checked by the access gate.
    #[debug(skip)]
    pub access_password: String,

    #[serde(default = "default_model")]
    pub openai_model: String,

    #[serde(default = "default_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-page fetch timeout. The model call itself is unbounded.
    #[serde(
        default = "default_fetch_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub fetch_timeout: Duration,

    /// Idle time after which a browser session is dropped.
    #[serde(
        default = "default_session_ttl",
        deserialize_with = "deserialize_duration"
    )]
    pub session_ttl: Duration,

    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Load from process environment variables (`PORT`, `OPENAI_API_KEY`, ...).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_figment(Figment::new().merge(Env::raw()))
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        figment.extract().context("Failed to load config")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_session_ttl() -> Duration {
    Duration::from_secs(12 * 60 * 60)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Parse a human duration such as `10s`, `1.5m` or `12h`.
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let parsed = DurationParser::with_all_time_units()
        .parse(text.trim())
        .map_err(|e| format!("invalid duration '{text}': {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration '{text}': {e}"))
}

/// Accepts bare integers (seconds) as well as duration strings; the env
/// provider hands over `10` as a number but `10s` as a string.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}
