//! In-process sink forwarding batches over an mpsc channel

use async_trait::async_trait;
use tokio::sync::mpsc;
use types::ExtractedTokenBatch;

use super::BatchSink;
use crate::{AdapterError, Result};

pub struct ChannelSink {
    sender: mpsc::Sender<ExtractedTokenBatch>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<ExtractedTokenBatch>) -> Self {
        Self { sender }
    }

    /// Sink plus the receiving end, with room for `capacity` batches
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ExtractedTokenBatch>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl BatchSink for ChannelSink {
    fn sink_type(&self) -> &str {
        "channel"
    }

    async fn emit(&self, batch: &ExtractedTokenBatch) -> Result<()> {
        self.sender
            .send(batch.clone())
            .await
            .map_err(|_| AdapterError::Other(anyhow::anyhow!("batch receiver dropped")))
    }
}
