//! Metadata extraction from the printable projection of a data section
//!
//! The section is projected to text one character per byte (non-printable
//! bytes become spaces), so a match index in the text is also a byte offset in
//! the section. Strings on the wire are length-prefixed; the prefix byte is
//! usually non-printable and simply separates the strings in the projection.

use crate::config::ExtractionConfig;
use crate::error::{ExtractionError, ExtractionResult};
use regex::Regex;
use types::{AddressKind, MetadataItem, MetadataKind, UrlKind};

/// Wrapped SOL mint, the quote side of most Solana pairs
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

const ADDRESS_PATTERN: &str = r"\b[1-9A-HJ-NP-Za-km-z]{32,44}\b";
const URL_PATTERN: &str = r#"https?://[^\s<>"]{2,}"#;

/// Maps bytes 32..=126 to themselves and everything else to a space
pub fn printable_projection(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (32..=126).contains(&b) { b as char } else { ' ' })
        .collect()
}

pub fn classify_address(address: &str) -> AddressKind {
    if address == SOL_MINT {
        AddressKind::SolToken
    } else if address.len() >= 40 {
        AddressKind::Contract
    } else {
        AddressKind::Unknown
    }
}

pub fn classify_url(url: &str) -> UrlKind {
    let url = url.to_ascii_lowercase();
    if url.contains("twitter.com") || url.contains("x.com") {
        UrlKind::Twitter
    } else if url.contains("t.me") || url.contains("telegram") {
        UrlKind::Telegram
    } else if [".com", ".io", ".xyz", ".org"]
        .iter()
        .any(|tld| url.contains(tld))
    {
        UrlKind::Website
    } else {
        UrlKind::Unknown
    }
}

#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    address: Regex,
    url: Regex,
    age: Option<Regex>,
    protocols: Vec<String>,
    max_protocol_hits: usize,
}

impl MetadataExtractor {
    pub fn new(config: &ExtractionConfig) -> ExtractionResult<Self> {
        let age = if config.age_indicators.is_empty() {
            None
        } else {
            let alternation = config
                .age_indicators
                .iter()
                .map(|indicator| regex::escape(indicator))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"\b({alternation})\b"))?)
        };

        Ok(Self {
            address: compile(ADDRESS_PATTERN)?,
            url: compile(URL_PATTERN)?,
            age,
            protocols: config
                .protocols
                .iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
            max_protocol_hits: config.max_protocol_hits,
        })
    }

    /// All metadata in `bytes`, ordered by offset
    pub fn extract(&self, bytes: &[u8], base_offset: usize) -> Vec<MetadataItem> {
        let text = printable_projection(bytes);
        let mut items = Vec::new();

        for found in self.address.find_iter(&text) {
            let kind = MetadataKind::Address(classify_address(found.as_str()));
            items.push(MetadataItem::new(base_offset + found.start(), kind, found.as_str()));
        }

        for found in self.url.find_iter(&text) {
            let kind = MetadataKind::Url(classify_url(found.as_str()));
            items.push(MetadataItem::new(base_offset + found.start(), kind, found.as_str()));
        }

        let lowered = text.to_ascii_lowercase();
        for protocol in &self.protocols {
            for (index, _) in lowered.match_indices(protocol.as_str()).take(self.max_protocol_hits) {
                items.push(MetadataItem::new(
                    base_offset + index,
                    MetadataKind::Protocol,
                    protocol.as_str(),
                ));
            }
        }

        if let Some(age) = &self.age {
            for found in age.find_iter(&text) {
                items.push(MetadataItem::new(
                    base_offset + found.start(),
                    MetadataKind::AgeIndicator,
                    found.as_str(),
                ));
            }
        }

        items.sort_by_key(|item| item.byte_offset);
        items
    }
}

pub(crate) fn compile(pattern: &str) -> ExtractionResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| ExtractionError::invalid_config(format!("pattern {pattern:?}: {e}")))
}
