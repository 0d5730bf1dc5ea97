//! Configuration module for adapters
//!
//! Connection settings with environment overrides. Every value has a default
//! that matches what the screener tolerates without throttling.

use config::service::{adapters, dexscreener};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Stream connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Maximum handshake attempts per second
    pub rate_limit_per_sec: f64,

    /// Maximum attempts per connect call
    pub max_retries: u32,

    /// Backoff base in seconds; the n-th failure waits `base * 2^min(n, cap)`
    pub backoff_base_secs: f64,

    /// Exponent cap for backoff doubling
    pub backoff_exponent_cap: u32,

    /// Uniform jitter applied to each backoff, as a fraction
    pub backoff_jitter: f64,

    /// Handshake timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Timeout for a single frame in milliseconds
    pub receive_timeout_ms: u64,

    /// Obtain challenge cookies before connecting
    pub challenge_bypass: bool,

    /// Seconds before cached challenge cookies are refreshed
    pub challenge_ttl_secs: u64,

    /// Page requested to obtain challenge cookies
    pub priming_url: String,

    /// Priming request timeout in milliseconds
    pub priming_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            rate_limit_per_sec: adapters::DEFAULT_RATE_LIMIT_RPS,
            max_retries: adapters::MAX_RECONNECTION_ATTEMPTS,
            backoff_base_secs: adapters::RECONNECTION_BACKOFF_BASE_MS as f64 / 1000.0,
            backoff_exponent_cap: adapters::BACKOFF_EXPONENT_CAP,
            backoff_jitter: 0.25,
            connect_timeout_ms: adapters::CONNECTION_TIMEOUT_MS,
            receive_timeout_ms: adapters::RECEIVE_TIMEOUT_MS,
            challenge_bypass: false,
            challenge_ttl_secs: adapters::CHALLENGE_TTL_SECS,
            priming_url: dexscreener::PRIMING_URL.to_string(),
            priming_timeout_ms: adapters::PRIMING_TIMEOUT_MS,
        }
    }
}

impl ConnectionSettings {
    /// Defaults overridden by `{prefix}_*` environment variables
    pub fn from_env(prefix: &str) -> Self {
        let mut settings = Self::default();
        settings.apply_env(prefix);
        settings
    }

    /// Override fields from `{prefix}_*` environment variables
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn apply_env(&mut self, prefix: &str) {
        let var = |name: &str| env::var(format!("{prefix}_{name}")).ok();

        if let Some(rate) = var("RATE_LIMIT").and_then(|s| s.parse().ok()) {
            self.rate_limit_per_sec = rate;
        }
        if let Some(retries) = var("MAX_RETRIES").and_then(|s| s.parse().ok()) {
            self.max_retries = retries;
        }
        if let Some(base) = var("BACKOFF_BASE").and_then(|s| s.parse().ok()) {
            self.backoff_base_secs = base;
        }
        if let Some(ms) = var("CONNECT_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.connect_timeout_ms = ms;
        }
        if let Some(ms) = var("RECEIVE_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.receive_timeout_ms = ms;
        }
        if let Some(flag) = var("CHALLENGE_BYPASS") {
            self.challenge_bypass = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(url) = var("PRIMING_URL") {
            self.priming_url = url;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.rate_limit_per_sec.is_finite() && self.rate_limit_per_sec > 0.0) {
            return Err("Rate limit must be greater than 0".to_string());
        }

        if self.rate_limit_per_sec < adapters::MIN_RATE_LIMIT_RPS {
            return Err(format!(
                "Rate limit must be at least {} requests per second",
                adapters::MIN_RATE_LIMIT_RPS
            ));
        }

        if self.max_retries == 0 {
            return Err("Max retries must be greater than 0".to_string());
        }

        if !(self.backoff_base_secs.is_finite() && self.backoff_base_secs >= 0.0) {
            return Err("Backoff base cannot be negative".to_string());
        }

        if !(0.0..1.0).contains(&self.backoff_jitter) {
            return Err("Backoff jitter must be in [0, 1)".to_string());
        }

        if self.longest_backoff_secs() > adapters::MAX_BACKOFF_SECS {
            return Err(format!(
                "Backoff can reach {:.0}s, more than the {}s limit",
                self.longest_backoff_secs(),
                adapters::MAX_BACKOFF_SECS
            ));
        }

        if self.connect_timeout_ms == 0 || self.receive_timeout_ms == 0 {
            return Err("Timeouts must be greater than 0".to_string());
        }

        if self.challenge_bypass
            && !self.priming_url.starts_with("http://")
            && !self.priming_url.starts_with("https://")
        {
            return Err("Priming URL must start with http:// or https://".to_string());
        }

        Ok(())
    }

    /// Capped backoff at the top of the jitter range
    pub fn longest_backoff_secs(&self) -> f64 {
        let doublings = self.backoff_exponent_cap.min(64) as i32;
        self.backoff_base_secs * 2f64.powi(doublings) * (1.0 + self.backoff_jitter)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    pub fn challenge_ttl(&self) -> Duration {
        Duration::from_secs(self.challenge_ttl_secs)
    }

    pub fn priming_timeout(&self) -> Duration {
        Duration::from_millis(self.priming_timeout_ms)
    }
}
