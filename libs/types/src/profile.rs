//! Token profiles reconstructed from candidate records
//!
//! Partial records are the normal case, so every market, identity, address and
//! social field is optional. A profile is built once and never mutated after it
//! is placed in a batch.

use serde::{Deserialize, Serialize};

/// Profiles at or above this confidence count as high confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Minimum `field_count` for a complete profile
pub const COMPLETE_MIN_FIELDS: u32 = 5;

/// Minimum `confidence_score` for a complete profile
pub const COMPLETE_MIN_CONFIDENCE: f64 = 0.3;

/// Structured view of one trading pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenProfile {
    // Identification
    pub symbol: Option<String>,
    pub token_name: Option<String>,
    pub chain: Option<String>,
    pub protocol: Option<String>,

    // Market data
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub txns_24h: Option<u64>,
    pub makers: Option<u64>,
    pub liquidity: Option<f64>,
    pub market_cap: Option<f64>,

    // Percentage changes, assigned by ascending byte offset
    pub change_5m: Option<f64>,
    pub change_1h: Option<f64>,
    pub change_6h: Option<f64>,
    pub change_24h: Option<f64>,

    // Addresses
    pub pair_address: Option<String>,
    pub creator_address: Option<String>,
    pub quote_address: Option<String>,

    // Social
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,

    /// Age marker found next to the record (`5m`, `1h`, `6h`, `24h`)
    pub pair_age: Option<String>,

    pub confidence_score: f64,
    pub field_count: u32,
    /// Absolute frame offset of the window the profile came from
    pub record_position: usize,
    pub record_span: usize,
    /// Unix seconds
    pub timestamp: i64,
}

impl TokenProfile {
    /// Counts the populated fields that make up `field_count`
    ///
    /// Only price, volume, txns, makers, liquidity, market cap, pair address,
    /// protocol and website contribute.
    pub fn populated_field_count(&self) -> u32 {
        [
            self.price.is_some(),
            self.volume_24h.is_some(),
            self.txns_24h.is_some(),
            self.makers.is_some(),
            self.liquidity.is_some(),
            self.market_cap.is_some(),
            self.pair_address.is_some(),
            self.protocol.is_some(),
            self.website.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.field_count >= COMPLETE_MIN_FIELDS && self.confidence_score >= COMPLETE_MIN_CONFIDENCE
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence_score >= HIGH_CONFIDENCE_THRESHOLD
    }

    /// Symbol, then token name, then a positional placeholder
    pub fn display_name(&self) -> String {
        self.symbol
            .clone()
            .or_else(|| self.token_name.clone())
            .unwrap_or_else(|| format!("Token_{}", self.record_position))
    }

    /// Single flat candle from the current price and 24h volume
    pub fn to_ohlc(&self) -> Option<OhlcCandle> {
        let price = self.price?;
        let volume = self.volume_24h?;
        Some(OhlcCandle {
            timestamp: self.timestamp,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        })
    }
}

/// OHLC candle handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcCandle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
