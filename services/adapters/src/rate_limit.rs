//! Rate limiting for connection attempts
//!
//! One permit per `1 / requests_per_sec`. The first request never waits.

use governor::{DefaultDirectRateLimiter, Quota};
use std::time::{Duration, Instant};

use crate::{AdapterError, Result};

/// Spacing enforcer for outbound handshakes
pub struct RateLimiter {
    limiter: DefaultDirectRateLimiter,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_sec` requests per second
    pub fn new(requests_per_sec: f64) -> Result<Self> {
        if !(requests_per_sec.is_finite() && requests_per_sec > 0.0) {
            return Err(AdapterError::Configuration(format!(
                "rate limit must be a positive number of requests per second, got {requests_per_sec}"
            )));
        }

        let min_interval = Duration::try_from_secs_f64(1.0 / requests_per_sec).map_err(|_| {
            AdapterError::Configuration(format!(
                "rate limit {requests_per_sec}/s gives an interval too long to represent"
            ))
        })?;
        let quota = Quota::with_period(min_interval).ok_or_else(|| {
            AdapterError::Configuration(format!(
                "rate limit {requests_per_sec}/s gives a zero interval"
            ))
        })?;

        Ok(Self {
            limiter: DefaultDirectRateLimiter::direct(quota),
            min_interval,
            last_request: None,
        })
    }

    /// Wait until a request is allowed and record it
    pub async fn wait(&mut self) {
        self.limiter.until_ready().await;
        self.last_request = Some(Instant::now());
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .field("last_request", &self.last_request)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_rates() {
        assert!(RateLimiter::new(0.0).is_err());
        assert!(RateLimiter::new(-1.0).is_err());
        assert!(RateLimiter::new(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_rates_too_slow_to_represent() {
        assert!(matches!(
            RateLimiter::new(1e-30),
            Err(AdapterError::Configuration(_))
        ));
        assert!(RateLimiter::new(1e-3).is_ok());
    }

    #[test]
    fn test_interval_from_rate() {
        let limiter = RateLimiter::new(4.0).unwrap();
        assert_eq!(limiter.min_interval(), Duration::from_millis(250));
        assert!(limiter.last_request().is_none());
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let mut limiter = RateLimiter::new(20.0).unwrap();

        limiter.wait().await;
        let first = limiter.last_request().unwrap();
        limiter.wait().await;
        let second = limiter.last_request().unwrap();

        // governor may release a few hundred microseconds early
        assert!(second.duration_since(first) >= Duration::from_millis(45));
    }
}
