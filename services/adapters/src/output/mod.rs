//! Output sinks for extracted token batches
//!
//! The stream loop hands every batch to a [`BatchSink`], empty ones included.
//! Sinks decide for themselves what is worth writing.

pub mod channel;
pub mod json_lines;

pub use channel::ChannelSink;
pub use json_lines::{EnhancedTokensLine, JsonLinesSink};

use crate::Result;
use async_trait::async_trait;
use types::ExtractedTokenBatch;

/// Destination for extracted batches
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Short name used in logs
    fn sink_type(&self) -> &str;

    /// Deliver one batch
    async fn emit(&self, batch: &ExtractedTokenBatch) -> Result<()>;
}
