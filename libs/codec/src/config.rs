//! Extraction engine tuning
//!
//! Every constant the decoder depends on lives here so it can be recalibrated
//! from TOML when the upstream format drifts. Defaults are the values validated
//! against live Solana frames.

use crate::error::{ExtractionError, ExtractionResult};
use crate::range_table::RangeTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Marker preceding the data section of a frame
    pub marker: String,
    /// Bytes from the marker start to the data section start
    pub marker_skip: usize,
    /// Frame version the ranges were validated against
    pub expected_version: String,

    pub window_size: usize,
    pub stride: usize,
    /// Minimum distinct field kinds for a window to count as a record
    pub min_field_kinds: usize,
    /// Metadata within this many bytes of a window start is attached to it
    pub metadata_distance: usize,
    pub max_clusters: usize,

    pub max_profiles: usize,
    pub min_confidence: f64,
    pub min_profile_fields: u32,
    pub chain: String,

    pub protocols: Vec<String>,
    pub max_protocol_hits: usize,
    pub age_indicators: Vec<String>,
    pub max_symbols: usize,

    pub value_ceiling: f64,
    pub value_floor: f64,

    pub ranges: RangeTable,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            marker: "pairs".to_string(),
            marker_skip: 20,
            expected_version: "1.3.0".to_string(),
            window_size: 500,
            stride: 200,
            min_field_kinds: 3,
            metadata_distance: 1000,
            max_clusters: 20,
            max_profiles: 50,
            min_confidence: 0.3,
            min_profile_fields: 3,
            chain: "solana".to_string(),
            protocols: vec!["pumpfun".to_string(), "pumpswap".to_string()],
            max_protocol_hits: 10,
            age_indicators: ["5m", "1h", "6h", "24h"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_symbols: 20,
            value_ceiling: 1e12,
            value_floor: 1e-10,
            ranges: RangeTable::standard(),
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> ExtractionResult<()> {
        if self.marker.is_empty() {
            return Err(ExtractionError::invalid_config("marker cannot be empty"));
        }
        if self.window_size == 0 {
            return Err(ExtractionError::invalid_config("window_size must be positive"));
        }
        if self.stride == 0 {
            return Err(ExtractionError::invalid_config("stride must be positive"));
        }
        if self.stride > self.window_size {
            return Err(ExtractionError::invalid_config(format!(
                "stride {} is larger than window_size {}, bytes would be skipped",
                self.stride, self.window_size
            )));
        }
        if self.min_field_kinds == 0 {
            return Err(ExtractionError::invalid_config("min_field_kinds must be positive"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ExtractionError::invalid_config(format!(
                "min_confidence {} outside [0, 1]",
                self.min_confidence
            )));
        }
        if !(self.value_floor >= 0.0 && self.value_floor < self.value_ceiling) {
            return Err(ExtractionError::invalid_config(format!(
                "value floor {} must be non-negative and below ceiling {}",
                self.value_floor, self.value_ceiling
            )));
        }
        if self.age_indicators.iter().any(|a| a.is_empty())
            || self.protocols.iter().any(|p| p.is_empty())
        {
            return Err(ExtractionError::invalid_config(
                "protocol and age indicator tokens cannot be empty",
            ));
        }

        self.ranges.validate().map_err(ExtractionError::InvalidConfig)
    }
}
