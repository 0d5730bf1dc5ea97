//! JSON-lines sink
//!
//! One line per non-empty batch:
//! `{"type":"enhanced_tokens","total_extracted":..,"high_confidence_count":..,"tokens":[..],"timestamp":..}`

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;
use tracing::debug;
use types::{ExtractedTokenBatch, TokenProfile};

use super::BatchSink;
use crate::Result;

pub const LINE_TYPE: &str = "enhanced_tokens";

/// Wire shape of one output line
#[derive(Debug, Serialize)]
pub struct EnhancedTokensLine<'a> {
    #[serde(rename = "type")]
    pub line_type: &'static str,
    pub total_extracted: usize,
    pub high_confidence_count: usize,
    /// Best `top_n` profiles by confidence then field count
    pub tokens: Vec<&'a TokenProfile>,
    pub timestamp: i64,
}

impl<'a> EnhancedTokensLine<'a> {
    pub fn from_batch(batch: &'a ExtractedTokenBatch, top_n: usize) -> Self {
        Self {
            line_type: LINE_TYPE,
            total_extracted: batch.total_extracted(),
            high_confidence_count: batch.high_confidence_count(),
            tokens: batch.get_top(top_n),
            timestamp: batch.extraction_timestamp(),
        }
    }
}

/// Writes batches as JSON lines to any async writer, stdout by default
pub struct JsonLinesSink<W = Stdout> {
    writer: Mutex<W>,
    top_n: usize,
}

impl JsonLinesSink<Stdout> {
    pub fn stdout(top_n: usize) -> Self {
        Self::new(tokio::io::stdout(), top_n)
    }
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W, top_n: usize) -> Self {
        Self {
            writer: Mutex::new(writer),
            top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> BatchSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn sink_type(&self) -> &str {
        "json_lines"
    }

    async fn emit(&self, batch: &ExtractedTokenBatch) -> Result<()> {
        if batch.is_empty() {
            debug!("Skipping empty batch");
            return Ok(());
        }

        let mut line = serde_json::to_vec(&EnhancedTokensLine::from_batch(batch, self.top_n))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}
