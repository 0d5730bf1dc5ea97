//! Batch assembler: the final filter, rank and cap for one extraction cycle

use crate::config::ExtractionConfig;
use types::{rank_descending, ExtractedTokenBatch, TokenProfile};

#[derive(Debug, Clone)]
pub struct BatchAssembler {
    min_confidence: f64,
    max_profiles: usize,
}

impl BatchAssembler {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            max_profiles: config.max_profiles,
        }
    }

    /// Drops low-confidence profiles, ranks the rest and caps the count
    ///
    /// Ranking is `(confidence_score, field_count)` descending and stable, so
    /// equal profiles keep their record order.
    pub fn assemble(&self, mut profiles: Vec<TokenProfile>, timestamp: i64) -> ExtractedTokenBatch {
        profiles.retain(|p| p.confidence_score >= self.min_confidence);
        profiles.sort_by(rank_descending);
        profiles.truncate(self.max_profiles);
        Self::finalize(profiles, timestamp)
    }

    /// Wraps an already-ranked list; counts are derived here and never patched
    pub fn finalize(tokens: Vec<TokenProfile>, timestamp: i64) -> ExtractedTokenBatch {
        ExtractedTokenBatch::new(tokens, timestamp)
    }
}
