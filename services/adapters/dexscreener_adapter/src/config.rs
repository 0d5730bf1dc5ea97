//! Configuration management for the DexScreener adapter
//!
//! Supports TOML files and `DEXSCREENER_*` environment variable overrides.
//! Every section has defaults, so an empty file is a valid configuration.

use adapter_service::ConnectionSettings;
use anyhow::{Context, Result};
use codec::ExtractionConfig;
use config::service::stream;
use config::{QueryConfig, RankBy, Timeframe};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "DEXSCREENER";

/// Stream loop pacing and output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Pause after a successful cycle
    pub cycle_delay_ms: u64,

    /// Pause after a failed cycle
    pub error_delay_ms: u64,

    /// Tokens written per JSON line
    pub top_tokens: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            cycle_delay_ms: stream::CYCLE_DELAY_MS,
            error_delay_ms: stream::ERROR_DELAY_MS,
            top_tokens: stream::TOP_TOKENS_PER_LINE,
        }
    }
}

impl StreamSettings {
    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_millis(self.error_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON log records
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete adapter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexScreenerConfig {
    /// Stream URL used instead of the one built from `query`
    pub endpoint: Option<String>,

    pub connection: ConnectionSettings,
    pub query: QueryConfig,
    pub extraction: ExtractionConfig,
    pub stream: StreamSettings,
    pub logging: LoggingConfig,
}

impl DexScreenerConfig {
    /// Load configuration from TOML file
    pub fn from_toml_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file: {}", file_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", file_path.display()))
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse TOML configuration")
    }

    /// Load configuration with environment variable overrides
    ///
    /// A missing file falls back to defaults.
    pub fn from_toml_with_env_overrides(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let mut config = if file_path.exists() {
            Self::from_toml_file(file_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        let var = |name: &str| env::var(format!("{ENV_PREFIX}_{name}")).ok();

        if let Some(endpoint) = var("ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Some(timeframe) = var("TIMEFRAME").and_then(|s| s.parse::<Timeframe>().ok()) {
            self.query.timeframe = timeframe;
        }

        if let Some(rank_by) = var("RANK_BY").and_then(|s| s.parse::<RankBy>().ok()) {
            self.query.rank_by = rank_by;
        }

        if let Some(ms) = var("CYCLE_DELAY_MS").and_then(|s| s.parse().ok()) {
            self.stream.cycle_delay_ms = ms;
        }

        if let Some(ms) = var("ERROR_DELAY_MS").and_then(|s| s.parse().ok()) {
            self.stream.error_delay_ms = ms;
        }

        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }

        self.connection.apply_env(ENV_PREFIX);
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("ws://") && !endpoint.starts_with("wss://") {
                return Err(anyhow::anyhow!(
                    "Endpoint must start with ws:// or wss://, got {}",
                    endpoint
                ));
            }
        }

        self.connection
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid connection settings")?;

        self.extraction
            .validate()
            .context("Invalid extraction settings")?;

        if self.stream.error_delay_ms == 0 {
            return Err(anyhow::anyhow!("Error delay must be greater than 0"));
        }

        if self.stream.top_tokens == 0 {
            return Err(anyhow::anyhow!("Top tokens per line must be greater than 0"));
        }

        Ok(())
    }

    /// Stream URL: the explicit endpoint, else the one built from the query
    pub fn websocket_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.query.build_websocket_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DexScreenerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config
            .websocket_url()
            .starts_with("wss://io.dexscreener.com/dex/screener/v5/pairs/h24/1?"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = DexScreenerConfig::from_toml_str("").unwrap();
        assert_eq!(config, DexScreenerConfig::default());
    }

    #[test]
    fn test_sections_from_toml() {
        let config = DexScreenerConfig::from_toml_str(
            r#"
            endpoint = "ws://127.0.0.1:9001/pairs"

            [connection]
            max_retries = 2
            challenge_bypass = true

            [query]
            timeframe = "h1"

            [extraction]
            window_size = 400
            stride = 100

            [stream]
            cycle_delay_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.websocket_url(), "ws://127.0.0.1:9001/pairs");
        assert_eq!(config.connection.max_retries, 2);
        assert!(config.connection.challenge_bypass);
        assert_eq!(config.query.timeframe, Timeframe::H1);
        assert_eq!(config.extraction.window_size, 400);
        assert_eq!(config.stream.cycle_delay(), Duration::from_millis(250));
        assert_eq!(config.stream.error_delay_ms, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_sections() {
        let mut config = DexScreenerConfig {
            endpoint: Some("http://not-a-socket".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.endpoint = None;
        config.extraction.stride = config.extraction.window_size + 1;
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("extraction"));

        config = DexScreenerConfig::default();
        config.connection.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("DEXSCREENER_TIMEFRAME", "m5");
        env::set_var("DEXSCREENER_CYCLE_DELAY_MS", "1500");
        env::set_var("DEXSCREENER_MAX_RETRIES", "9");

        let mut config = DexScreenerConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.query.timeframe, Timeframe::M5);
        assert_eq!(config.stream.cycle_delay_ms, 1500);
        assert_eq!(config.connection.max_retries, 9);

        env::remove_var("DEXSCREENER_TIMEFRAME");
        env::remove_var("DEXSCREENER_CYCLE_DELAY_MS");
        env::remove_var("DEXSCREENER_MAX_RETRIES");
    }
}
