//! Runtime configuration
//!
//! Values come from the process environment, after `.env` has been loaded by the binary.

use crate::error::AssistantError;
use crate::oracle::Credential;
use crate::Result;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub credentials: Vec<Credential>,
    pub model: String,
    /// Overrides the retry bound; `None` means one attempt per credential.
    pub max_retries: Option<usize>,
    pub request_timeout: Duration,
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (tests pass a closure over a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_keys = lookup("GEMINI_API_KEYS")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .unwrap_or_default();

        let credentials: Vec<Credential> = raw_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(Credential::new)
            .collect();

        if credentials.is_empty() {
            return Err(AssistantError::Config(
                "GEMINI_API_KEYS is not set (comma-separated list of API keys)".to_string(),
            ));
        }

        let model = lookup("GEMINI_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_retries = match lookup("ORACLE_MAX_RETRIES") {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|_| {
                AssistantError::Config(format!("ORACLE_MAX_RETRIES is not a number: {}", raw))
            })?),
            None => None,
        };

        let timeout_secs = match lookup("ORACLE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AssistantError::Config(format!("ORACLE_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            credentials,
            model,
            max_retries,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
