//! Extraction errors for frame decoding
//!
//! Frame-level errors never escape the engine's frame entry point: a frame that
//! fails to locate or validate becomes an empty batch. They are surfaced for
//! callers that work on sections directly and for logging.

use thiserror::Error;

/// Errors raised while locating or validating a data section
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    /// The marker string that precedes the data section is absent
    #[error("Marker {marker:?} not found in {frame_len}-byte frame")]
    MarkerNotFound { marker: String, frame_len: usize },

    /// The marker was found but the frame ends before the data section starts
    #[error("Truncated data section: marker at {marker_offset}, data would start at {data_start} but frame is {frame_len} bytes")]
    TruncatedSection {
        marker_offset: usize,
        data_start: usize,
        frame_len: usize,
    },

    /// Extraction configuration is unusable
    #[error("Invalid extraction config: {0}")]
    InvalidConfig(String),
}

impl ExtractionError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// True for errors caused by the frame contents rather than configuration
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            ExtractionError::MarkerNotFound { .. } | ExtractionError::TruncatedSection { .. }
        )
    }
}

/// Result alias for extraction operations
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;
