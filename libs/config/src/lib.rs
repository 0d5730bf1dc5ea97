//! # Screener Configuration
//!
//! Stream query types and shared service defaults.
//!
//! ## Features
//!
//! - **Query Builder**: chain, timeframe, ranking and filter settings rendered
//!   into the stream URL
//! - **Service Defaults**: endpoints, timeouts, rate limits and stream pacing
//!
//! ## Usage
//!
//! ```rust
//! use config::{QueryConfig, RankBy, Timeframe};
//!
//! let query = QueryConfig {
//!     timeframe: Timeframe::H6,
//!     rank_by: RankBy::Volume,
//!     ..Default::default()
//! };
//! assert!(query.build_websocket_url().contains("/pairs/h6/1?rankBy[key]=volume"));
//! ```

pub mod query;
pub mod service;

pub use query::{Bounds, Chain, Dex, Filters, Order, QueryConfig, RankBy, Timeframe, WindowedBounds};
