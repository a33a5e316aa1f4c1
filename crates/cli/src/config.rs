//! Shell configuration from environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use stockcard_inventory::snapshot::DEFAULT_CURRENCY;
use stockcard_observability::{LogConfig, LogFormat};

pub const ENV_CURRENCY: &str = "STOCKCARD_CURRENCY";
pub const ENV_LOG: &str = "STOCKCARD_LOG";
pub const ENV_LOG_FORMAT: &str = "STOCKCARD_LOG_FORMAT";
pub const ENV_OUTPUT: &str = "STOCKCARD_OUTPUT";

/// How the "view card" action renders a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl core::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format {other:?} (expected text or json)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    pub currency: String,
    pub output: OutputFormat,
    pub log: LogConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            output: OutputFormat::Text,
            log: LogConfig::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(currency) = get(ENV_CURRENCY) {
            config.currency = currency.trim().to_string();
        }
        if let Some(output) = get(ENV_OUTPUT) {
            config.output = output
                .parse::<OutputFormat>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {ENV_OUTPUT}"))?;
        }
        if let Some(level) = get(ENV_LOG) {
            config.log.level = level.trim().to_string();
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.log.format = format
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {ENV_LOG_FORMAT}"))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ShellConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.currency, "RUB");
    }

    #[test]
    fn reads_every_key() {
        let config = ShellConfig::from_lookup(lookup(&[
            (ENV_CURRENCY, " EUR "),
            (ENV_OUTPUT, "json"),
            (ENV_LOG, "debug"),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .unwrap();

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = ShellConfig::from_lookup(lookup(&[(ENV_CURRENCY, "  ")])).unwrap();
        assert_eq!(config.currency, "RUB");
    }

    #[test]
    fn rejects_unknown_output_format() {
        let err = ShellConfig::from_lookup(lookup(&[(ENV_OUTPUT, "xml")])).unwrap_err();
        assert!(err.to_string().contains(ENV_OUTPUT));
    }
}
