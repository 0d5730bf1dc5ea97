//! Extraction engine: one frame in, one batch out
//!
//! Frame-format failures never escape [`ExtractionEngine::extract_frame`]. A
//! frame that cannot be located or yields no records is an empty batch, and
//! the stream carries on with the next frame.

use crate::batch::BatchAssembler;
use crate::cluster::ClusterAssembler;
use crate::config::ExtractionConfig;
use crate::error::ExtractionResult;
use crate::frame::locate_data_section;
use crate::profile::ProfileBuilder;
use chrono::Utc;
use tracing::debug;
use types::{CandidateRecord, ExtractedTokenBatch};

#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    config: ExtractionConfig,
    assembler: ClusterAssembler,
    profiles: ProfileBuilder,
    batches: BatchAssembler,
}

impl ExtractionEngine {
    /// Validates the configuration and compiles the text patterns
    pub fn new(config: ExtractionConfig) -> ExtractionResult<Self> {
        config.validate()?;

        Ok(Self {
            assembler: ClusterAssembler::new(&config)?,
            profiles: ProfileBuilder::new(&config),
            batches: BatchAssembler::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts a frame stamped with the current time
    pub fn extract_frame(&self, frame: &[u8]) -> ExtractedTokenBatch {
        self.extract_frame_at(frame, Utc::now().timestamp())
    }

    pub fn extract_frame_at(&self, frame: &[u8], timestamp: i64) -> ExtractedTokenBatch {
        match locate_data_section(frame, &self.config) {
            Ok(section) => {
                debug!(
                    frame_len = frame.len(),
                    marker_offset = section.marker_offset,
                    section_len = section.bytes.len(),
                    "Located data section"
                );
                self.extract_section(section.bytes, section.base_offset, timestamp)
            }
            Err(e) => {
                debug!(frame_len = frame.len(), error = %e, "No data section in frame");
                ExtractedTokenBatch::empty(timestamp)
            }
        }
    }

    /// Candidate records of a data section, most complete first
    pub fn records(&self, data: &[u8], base_offset: usize) -> Vec<CandidateRecord> {
        self.assembler.assemble(data, base_offset)
    }

    /// Extracts a bare data section whose first byte sits at `base_offset`
    pub fn extract_section(
        &self,
        data: &[u8],
        base_offset: usize,
        timestamp: i64,
    ) -> ExtractedTokenBatch {
        let records = self.records(data, base_offset);

        let profiles: Vec<_> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| self.profiles.build(record, index, timestamp))
            .collect();

        let batch = self.batches.assemble(profiles, timestamp);
        if batch.is_empty() {
            debug!(
                section_len = data.len(),
                records = records.len(),
                "Extraction produced no profiles"
            );
        } else {
            debug!(
                records = records.len(),
                total = batch.total_extracted(),
                high_confidence = batch.high_confidence_count(),
                "Extracted token batch"
            );
        }
        batch
    }
}
