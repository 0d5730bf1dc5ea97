//! One extraction cycle's worth of token profiles

use crate::profile::{OhlcCandle, TokenProfile};
use serde::Serialize;
use std::cmp::Ordering;

/// Ordered token profiles plus counts derived from them
///
/// The counts are computed when the batch is built and the token list cannot be
/// changed afterwards, so they always match a fresh recount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedTokenBatch {
    tokens: Vec<TokenProfile>,
    extraction_timestamp: i64,
    total_extracted: usize,
    high_confidence_count: usize,
    complete_profiles_count: usize,
}

impl ExtractedTokenBatch {
    pub fn new(tokens: Vec<TokenProfile>, extraction_timestamp: i64) -> Self {
        let total_extracted = tokens.len();
        let high_confidence_count = tokens.iter().filter(|t| t.is_high_confidence()).count();
        let complete_profiles_count = tokens.iter().filter(|t| t.is_complete()).count();

        Self {
            tokens,
            extraction_timestamp,
            total_extracted,
            high_confidence_count,
            complete_profiles_count,
        }
    }

    pub fn empty(extraction_timestamp: i64) -> Self {
        Self::new(Vec::new(), extraction_timestamp)
    }

    pub fn tokens(&self) -> &[TokenProfile] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<TokenProfile> {
        self.tokens
    }

    pub fn extraction_timestamp(&self) -> i64 {
        self.extraction_timestamp
    }

    pub fn total_extracted(&self) -> usize {
        self.total_extracted
    }

    pub fn high_confidence_count(&self) -> usize {
        self.high_confidence_count
    }

    pub fn complete_profiles_count(&self) -> usize {
        self.complete_profiles_count
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Best `n` profiles by confidence, then field count
    ///
    /// Ties keep insertion order. Does not reorder the batch itself.
    pub fn get_top(&self, n: usize) -> Vec<&TokenProfile> {
        let mut ranked: Vec<&TokenProfile> = self.tokens.iter().collect();
        ranked.sort_by(|a, b| rank_descending(a, b));
        ranked.truncate(n);
        ranked
    }

    /// Candles for every profile that has both a price and a volume
    pub fn to_ohlc_batch(&self) -> Vec<OhlcCandle> {
        self.tokens.iter().filter_map(TokenProfile::to_ohlc).collect()
    }
}

/// Descending order on `(confidence_score, field_count)`
pub fn rank_descending(a: &TokenProfile, b: &TokenProfile) -> Ordering {
    b.confidence_score
        .total_cmp(&a.confidence_score)
        .then_with(|| b.field_count.cmp(&a.field_count))
}
