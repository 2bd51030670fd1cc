//! Runtime configuration, read from `RAGDESK_*` environment variables.

use crate::application::rate_limit::RateLimitConfig;
use crate::domain::error::DomainError;
use crate::infrastructure::persistence::json_snapshot::JsonSnapshotStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Voyage,
    Hashing,
}

impl ProviderKind {
    pub fn needs_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Hashing)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Voyage => write!(f, "voyage"),
            ProviderKind::Hashing => write!(f, "hashing"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "voyage" => Ok(ProviderKind::Voyage),
            "hashing" | "local" => Ok(ProviderKind::Hashing),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot file holding the document collection.
    pub db_path: PathBuf,
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: Option<String>,
    pub rate_limit: RateLimitConfig,
    /// How often expired rate-limit entries are swept.
    pub sweep_interval_ms: u64,
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: JsonSnapshotStore::default_path(),
            provider: ProviderKind::Hashing,
            api_key: String::new(),
            model: None,
            rate_limit: RateLimitConfig::default(),
            sweep_interval_ms: 60_000,
            top_k: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(path) = lookup("RAGDESK_DB") {
            cfg.db_path = PathBuf::from(path);
        }
        if let Some(p) = lookup("RAGDESK_EMBEDDING_PROVIDER") {
            cfg.provider = p.parse().map_err(DomainError::Config)?;
        }
        cfg.api_key = lookup("RAGDESK_EMBEDDING_API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .unwrap_or_default();
        cfg.model = lookup("RAGDESK_EMBEDDING_MODEL").filter(|m| !m.is_empty());

        if let Some(v) = lookup("RAGDESK_RATE_LIMIT_MAX") {
            cfg.rate_limit.max_requests = parse_number("RAGDESK_RATE_LIMIT_MAX", &v)?;
        }
        if let Some(v) = lookup("RAGDESK_RATE_LIMIT_WINDOW_MS") {
            cfg.rate_limit.window_ms = parse_number("RAGDESK_RATE_LIMIT_WINDOW_MS", &v)?;
        }
        if let Some(v) = lookup("RAGDESK_RATE_LIMIT_SWEEP_MS") {
            cfg.sweep_interval_ms = parse_number("RAGDESK_RATE_LIMIT_SWEEP_MS", &v)?;
        }
        if let Some(v) = lookup("RAGDESK_TOP_K") {
            cfg.top_k = parse_number("RAGDESK_TOP_K", &v)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.provider.needs_api_key() && self.api_key.is_empty() {
            return Err(DomainError::Config(format!(
                "provider '{}' requires RAGDESK_EMBEDDING_API_KEY (or GEMINI_API_KEY)",
                self.provider
            )));
        }
        if self.sweep_interval_ms == 0 {
            return Err(DomainError::Config("RAGDESK_RATE_LIMIT_SWEEP_MS must be positive".into()));
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::Config(format!("{key}: not a valid number: {value}")))
}
