//! # DexScreener Adapter
//!
//! Long-running scraper for the screener's pairs stream. Each cycle takes the
//! next data frame off the WebSocket, runs it through the extraction engine and
//! hands the resulting batch to a sink.
//!
//! Connection handling (rate limiting, retries, challenge cookies) comes from
//! `adapter-service`; decoding comes from `codec`.

pub mod config;
pub mod stream;

pub use config::{DexScreenerConfig, LoggingConfig, StreamSettings};
pub use stream::{StreamLoop, StreamStats};
