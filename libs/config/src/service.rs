//! Service configuration and defaults
//!
//! Default values and fixed endpoints shared by the streaming adapter and its
//! configuration layer.

/// Screener endpoints
pub mod dexscreener {
    /// Pairs stream; `/{timeframe}/1?{query}` is appended
    pub const STREAM_BASE_URL: &str = "wss://io.dexscreener.com/dex/screener/v5/pairs";

    /// Origin presented by browser sessions
    pub const ORIGIN: &str = "https://dexscreener.com";

    /// Page fetched to obtain challenge cookies
    pub const PRIMING_URL: &str = "https://dexscreener.com";
}

/// Adapter service defaults
pub mod adapters {
    /// Connection timeout (milliseconds)
    pub const CONNECTION_TIMEOUT_MS: u64 = 30_000;

    /// Receive timeout for a single frame (milliseconds)
    pub const RECEIVE_TIMEOUT_MS: u64 = 30_000;

    /// Reconnection backoff base (milliseconds)
    pub const RECONNECTION_BACKOFF_BASE_MS: u64 = 1_000;

    /// Backoff exponent cap; delays stop doubling after this many failures
    pub const BACKOFF_EXPONENT_CAP: u32 = 8;

    /// Maximum connection attempts per connect call
    pub const MAX_RECONNECTION_ATTEMPTS: u32 = 5;

    /// Rate limit (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: f64 = 4.0;

    /// Slowest accepted rate limit (requests per second)
    pub const MIN_RATE_LIMIT_RPS: f64 = 1e-3;

    /// Longest accepted backoff, including jitter (seconds)
    pub const MAX_BACKOFF_SECS: f64 = 86_400.0;

    /// Challenge cookies are refreshed after this many seconds
    pub const CHALLENGE_TTL_SECS: u64 = 300;

    /// Priming request timeout (milliseconds)
    pub const PRIMING_TIMEOUT_MS: u64 = 30_000;
}

/// Stream loop defaults
pub mod stream {
    /// Pause between extraction cycles (milliseconds)
    pub const CYCLE_DELAY_MS: u64 = 5_000;

    /// Pause after a failed cycle (milliseconds)
    pub const ERROR_DELAY_MS: u64 = 10_000;

    /// Profiles written per JSON line
    pub const TOP_TOKENS_PER_LINE: usize = 10;
}
