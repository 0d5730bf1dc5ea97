//! Stream loop: receive, extract, emit, repeat
//!
//! One connection is kept open across cycles. A cycle reads frames until one
//! carries data, answering keepalives on the way, and runs it through the
//! extraction engine. Any receive failure drops the socket and the next cycle
//! reconnects through the connection manager.
//!
//! Shutdown is a `watch` channel. It is observed between cycles and while
//! connecting, receiving or sleeping, and the socket is closed on the way out.

use adapter_service::{AdapterError, BatchSink, ConnectionManager, Result};
use codec::ExtractionEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use types::ExtractedTokenBatch;

use crate::config::{DexScreenerConfig, StreamSettings};

/// Counters since the loop started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub frames: u64,
    pub keepalives: u64,
    pub tokens_extracted: u64,
}

pub struct StreamLoop {
    connection: ConnectionManager,
    engine: ExtractionEngine,
    sink: Arc<dyn BatchSink>,
    settings: StreamSettings,
    shutdown: watch::Receiver<bool>,
    stats: StreamStats,
}

impl StreamLoop {
    pub fn new(
        connection: ConnectionManager,
        engine: ExtractionEngine,
        sink: Arc<dyn BatchSink>,
        settings: StreamSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            connection,
            engine,
            sink,
            settings,
            shutdown,
            stats: StreamStats::default(),
        }
    }

    /// Build the connection manager and engine from a validated configuration
    pub fn from_config(
        config: &DexScreenerConfig,
        sink: Arc<dyn BatchSink>,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<Self> {
        let connection = ConnectionManager::new(config.websocket_url(), config.connection.clone())?;
        let engine = ExtractionEngine::new(config.extraction.clone())?;

        Ok(Self::new(
            connection,
            engine,
            sink,
            config.stream.clone(),
            shutdown,
        ))
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Run cycles until shutdown is signalled
    ///
    /// Cycle failures are logged and followed by the error delay; they never end
    /// the loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("Stream loop starting against {}", self.connection.url());

        while !self.shutdown_requested() {
            let delay = match self.cycle().await {
                Ok(Some(batch)) => {
                    emit(self.sink.as_ref(), &batch).await;
                    self.settings.cycle_delay()
                }
                Ok(None) => break,
                Err(e) => {
                    self.stats.failed_cycles += 1;
                    error!(
                        retry_count = self.connection.state().retry_count,
                        "Stream cycle failed: {}", e
                    );
                    self.settings.error_delay()
                }
            };

            if self.sleep_or_shutdown(delay).await {
                break;
            }
        }

        self.connection.close().await?;
        info!(
            cycles = self.stats.cycles,
            failed_cycles = self.stats.failed_cycles,
            tokens = self.stats.tokens_extracted,
            "Stream loop stopped"
        );
        Ok(())
    }

    /// Connect, extract one data frame, emit it and close
    ///
    /// Returns an empty batch when shutdown interrupts the cycle.
    pub async fn run_once(&mut self) -> Result<ExtractedTokenBatch> {
        let outcome = self.cycle().await;
        self.connection.close().await?;

        match outcome? {
            Some(batch) => {
                emit(self.sink.as_ref(), &batch).await;
                Ok(batch)
            }
            None => Ok(ExtractedTokenBatch::empty(0)),
        }
    }

    /// `None` when shutdown arrived before a data frame did
    async fn cycle(&mut self) -> Result<Option<ExtractedTokenBatch>> {
        self.stats.cycles += 1;

        if !self.connection.is_connected() {
            tokio::select! {
                connected = self.connection.connect() => connected?,
                _ = self.shutdown.changed() => return Ok(None),
            }
        }

        let frame = match self.next_data_frame().await? {
            Some(frame) => frame,
            None => return Ok(None),
        };

        let batch = self.engine.extract_frame(&frame);
        self.stats.frames += 1;
        self.stats.tokens_extracted += batch.total_extracted() as u64;

        if batch.is_empty() {
            debug!(frame_len = frame.len(), "No tokens extracted from frame");
        } else {
            info!(
                frame_len = frame.len(),
                tokens = batch.total_extracted(),
                high_confidence = batch.high_confidence_count(),
                "Extracted token batch"
            );
        }

        Ok(Some(batch))
    }

    /// Read until a frame carries data, answering keepalives
    async fn next_data_frame(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let message = tokio::select! {
                message = self.connection.receive() => message,
                _ = self.shutdown.changed() => return Ok(None),
            };

            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    self.connection.close().await.ok();
                    return Err(e);
                }
            };

            match message {
                Message::Binary(data) => return Ok(Some(data)),
                Message::Text(text) if text == "ping" => {
                    self.stats.keepalives += 1;
                    self.connection
                        .send(Message::Text("pong".to_string()))
                        .await?;
                }
                Message::Text(text) => return Ok(Some(text.into_bytes())),
                Message::Ping(payload) => {
                    self.stats.keepalives += 1;
                    self.connection.send(Message::Pong(payload)).await?;
                }
                Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(frame) => {
                    self.connection.close().await.ok();
                    return Err(AdapterError::ConnectionClosed {
                        reason: frame.map(|f| f.reason.to_string()),
                    });
                }
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// `true` when shutdown arrived during the sleep
    async fn sleep_or_shutdown(&mut self, delay: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = self.shutdown.changed() => true,
        }
    }
}

/// Sink failures are logged and never end the loop
async fn emit(sink: &dyn BatchSink, batch: &ExtractedTokenBatch) {
    if let Err(e) = sink.emit(batch).await {
        warn!("Failed to emit batch to {}: {}", sink.sink_type(), e);
    }
}
