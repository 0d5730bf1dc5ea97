//! Textual metadata found in the printable projection of a data section

use serde::{Deserialize, Serialize};

/// Address classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// The wrapped SOL mint, used as the quote side of a pair
    SolToken,
    /// Long enough to be a program or mint account
    Contract,
    Unknown,
}

/// URL classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlKind {
    Twitter,
    Telegram,
    Website,
    Unknown,
}

/// What a metadata item is, including its subtype where one exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "subtype")]
pub enum MetadataKind {
    Address(AddressKind),
    Url(UrlKind),
    Protocol,
    /// A pair-age marker such as `5m` or `24h`
    AgeIndicator,
}

impl MetadataKind {
    /// Subtype label as rendered in logs and JSON
    pub fn subtype(&self) -> &'static str {
        match self {
            MetadataKind::Address(AddressKind::SolToken) => "sol_token",
            MetadataKind::Address(AddressKind::Contract) => "contract",
            MetadataKind::Address(AddressKind::Unknown) => "unknown",
            MetadataKind::Url(UrlKind::Twitter) => "twitter",
            MetadataKind::Url(UrlKind::Telegram) => "telegram",
            MetadataKind::Url(UrlKind::Website) => "website",
            MetadataKind::Url(UrlKind::Unknown) => "unknown",
            MetadataKind::Protocol => "dex",
            MetadataKind::AgeIndicator => "age",
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, MetadataKind::Address(_))
    }

    pub fn is_url(&self) -> bool {
        matches!(self, MetadataKind::Url(_))
    }
}

/// One piece of text metadata with its absolute byte offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub byte_offset: usize,
    pub kind: MetadataKind,
    pub text: String,
}

impl MetadataItem {
    pub fn new(byte_offset: usize, kind: MetadataKind, text: impl Into<String>) -> Self {
        Self {
            byte_offset,
            kind,
            text: text.into(),
        }
    }

    /// Absolute distance between this item and a byte position
    pub fn distance_to(&self, position: usize) -> usize {
        self.byte_offset.abs_diff(position)
    }
}

/// How a symbol candidate was recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolSource {
    /// A known ticker
    Whitelisted,
    /// `$TICKER`
    DollarPrefixed,
    /// Follows a `symbol`, `name` or `token` keyword
    ContextBased,
    /// Bare uppercase word
    Uppercase,
    /// Capitalised word such as `Phantom`
    MixedCase,
}

/// A possible token symbol seen in the data section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCandidate {
    /// Offset of the first occurrence
    pub byte_offset: usize,
    pub symbol: String,
    pub source: SymbolSource,
    pub confidence: f64,
    /// Number of occurrences in the section
    pub frequency: u32,
}

impl SymbolCandidate {
    pub fn distance_to(&self, position: usize) -> usize {
        self.byte_offset.abs_diff(position)
    }
}
