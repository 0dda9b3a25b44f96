//! Process-wide configuration
//!
//! Loaded once at startup from the environment. This is the only global
//! mutable-adjacent state in the crate besides the policy advisor's cooldown
//! flag (see [`crate::policy::llm`]) — everything else is injected, per the
//! design note in SPEC_FULL.md §2.

use std::env;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors loading process configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("environment variable {name} is not a valid integer: {source}")]
    InvalidInt {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string for the persisted connection/goal/streak store.
    pub database_url: String,
    /// API key for the LLM provider backing the Policy Advisor.
    pub llm_api_key: String,
    /// SMTP credentials for the outbound email subsystem (interface-only; see
    /// [`crate::effects::email`]).
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    /// IST offset in minutes. Fixed at 330 (+05:30); kept as a field rather
    /// than a literal so tests can assert the constant is actually wired
    /// through, not to make it configurable (spec §1 Non-goals).
    pub ist_offset_minutes: i32,
    /// Log level passed to the tracing env-filter.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables, applying the same
    /// defaults the Python prototype's `Settings` class used where the spec
    /// doesn't mandate a required value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            llm_api_key: env::var("LLM_API_KEY").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: parse_int("SMTP_PORT", 587)?,
            smtp_user: env::var("SMTP_USER").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            ist_offset_minutes: 330,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_int(name: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidInt { name, source }),
        Err(_) => Ok(default),
    }
}
