//! # Screener Adapters - Stream Connection Layer
//!
//! ## Purpose
//!
//! Connection plumbing between the screener's WebSocket endpoint and the
//! extraction engine. Owns everything that touches the network: handshake
//! headers, challenge-bypass cookies, rate limiting, retry with backoff, and the
//! output seam batches leave through.
//!
//! ## Integration Points
//!
//! - **Input Source**: one WebSocket stream pushing binary pairs frames
//! - **Challenge Bypass**: HTTP priming request yielding clearance cookies
//! - **Output Destinations**: any [`BatchSink`] (JSON lines on stdout, mpsc channel)
//! - **Configuration**: [`ConnectionSettings`] with `{PREFIX}_*` environment overrides
//! - **Error Handling**: [`AdapterError`] split into recoverable and permanent failures
//!
//! ## Architecture Role
//!
//! Adapters stay stateless with respect to market data. The only state held here
//! is connection bookkeeping: the phase, consecutive failures, the header
//! rotation index and cached cookies. Decoding lives in `codec`; scheduling of
//! cycles lives in the `dexscreener-adapter` service.
//!
//! See [`architecture_diagram()`] for visual representation of the data flow.
//!
//! ## Connection Profile
//!
//! - **Handshake Spacing**: at least `1 / rate_limit_per_sec` between attempts
//! - **Backoff**: `base * 2^min(n, cap)` seconds after the n-th failure, ±25% jitter
//! - **Attempt Budget**: `max_retries` per `connect()` call, reset on success
//! - **Cookie TTL**: 300 seconds before the priming request is repeated
//!
//! ## Examples
//!
//! ```no_run
//! use adapter_service::{ConnectionManager, ConnectionSettings};
//!
//! # async fn run() -> adapter_service::Result<()> {
//! let settings = ConnectionSettings::from_env("DEXSCREENER");
//! let mut connection = ConnectionManager::new(
//!     "wss://io.dexscreener.com/dex/screener/v5/pairs/h24/1",
//!     settings,
//! )?;
//!
//! connection.connect().await?;
//! let frame = connection.receive().await?;
//! println!("received {} bytes", frame.len());
//! connection.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod rate_limit;

pub use config::ConnectionSettings;
pub use error::{AdapterError, Result};
pub use input::{
    ChallengePreparation, ChallengeSession, ConnectionManager, ConnectionPhase, ConnectionState,
    HeaderRotation,
};
pub use output::{BatchSink, ChannelSink, JsonLinesSink};
pub use rate_limit::RateLimiter;

/// Architecture diagram showing the stream data flow and component relationships
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph LR
///     subgraph Upstream["Screener"]
///         direction TB
///         PG[Priming Page]
///         WS[WebSocket Stream]
///     end
///
///     subgraph Adapters["Adapter Layer"]
///         direction TB
///         CH[ChallengeSession]
///         HR[HeaderRotation]
///         RL[RateLimiter]
///         CM[ConnectionManager]
///     end
///
///     subgraph Engine["Extraction Engine"]
///         direction TB
///         EX[ExtractionEngine]
///     end
///
///     subgraph Sinks["Batch Sinks"]
///         direction TB
///         JL[JsonLinesSink]
///         CS[ChannelSink]
///     end
///
///     PG --> CH
///     CH --> CM
///     HR --> CM
///     RL --> CM
///     WS --> CM
///     CM --> EX
///     EX --> JL
///     EX --> CS
///
///     style Upstream fill:#ffebee
///     style Adapters fill:#fff3e0
///     style Engine fill:#e8f5e9
///     style Sinks fill:#e3f2fd
/// ```
pub fn architecture_diagram() {
    // This function exists solely for documentation purposes
    // The diagram is rendered by aquamarine in rustdoc
}
