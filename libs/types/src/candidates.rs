//! Numeric candidates decoded from the binary data section
//!
//! A candidate is a tentative reading of a few bytes as a number. Whether the
//! reading means anything is decided later by the range table; these types only
//! carry the raw observation (where, what, how it was decoded).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire encoding a candidate was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// 4-byte little-endian IEEE-754 float
    F32,
    /// 8-byte little-endian IEEE-754 double
    F64,
    /// 4-byte little-endian unsigned integer
    U32,
}

impl Encoding {
    /// Number of bytes consumed by one value of this encoding
    pub const fn width(self) -> usize {
        match self {
            Encoding::F32 | Encoding::U32 => 4,
            Encoding::F64 => 8,
        }
    }

    /// True for the two IEEE-754 encodings
    pub const fn is_float(self) -> bool {
        matches!(self, Encoding::F32 | Encoding::F64)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::F32 => "f32",
            Encoding::F64 => "f64",
            Encoding::U32 => "u32",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic meaning assigned to a numeric candidate
///
/// Declaration order doubles as the ordering used when classified fields are
/// grouped into maps, so iteration over a record is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Price,
    TxCount,
    MakerCount,
    Volume,
    Liquidity,
    MarketCap,
    PercentChange,
    /// Decoded cleanly but fits no known range
    Unclassified,
}

impl FieldKind {
    /// Every kind that counts towards field-type diversity
    pub const CLASSIFIED: [FieldKind; 7] = [
        FieldKind::Price,
        FieldKind::TxCount,
        FieldKind::MakerCount,
        FieldKind::Volume,
        FieldKind::Liquidity,
        FieldKind::MarketCap,
        FieldKind::PercentChange,
    ];

    pub fn is_classified(self) -> bool {
        self != FieldKind::Unclassified
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Price => "price",
            FieldKind::TxCount => "tx_count",
            FieldKind::MakerCount => "maker_count",
            FieldKind::Volume => "volume",
            FieldKind::Liquidity => "liquidity",
            FieldKind::MarketCap => "market_cap",
            FieldKind::PercentChange => "percent_change",
            FieldKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value decoded at one byte offset with one encoding
///
/// `byte_offset` is absolute within the frame the bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericCandidate {
    pub byte_offset: usize,
    pub value: f64,
    pub encoding: Encoding,
}

impl NumericCandidate {
    pub fn new(byte_offset: usize, value: f64, encoding: Encoding) -> Self {
        Self {
            byte_offset,
            value,
            encoding,
        }
    }
}

/// A numeric candidate tagged with the field kind the range table assigned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedField {
    pub candidate: NumericCandidate,
    pub kind: FieldKind,
}

impl ClassifiedField {
    pub fn new(candidate: NumericCandidate, kind: FieldKind) -> Self {
        Self { candidate, kind }
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.candidate.byte_offset
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.candidate.value
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.candidate.encoding
    }
}
