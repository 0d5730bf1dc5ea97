//! Token symbol candidates and their scoring
//!
//! Symbols are weak evidence: any uppercase word in a binary blob looks like a
//! ticker. Each recognition strategy therefore carries its own base confidence,
//! and [`score`] adds bonuses for repetition and for the stronger strategies.

use crate::config::ExtractionConfig;
use crate::error::ExtractionResult;
use crate::metadata::{compile, printable_projection};
use regex::Regex;
use std::collections::HashMap;
use types::{SymbolCandidate, SymbolSource};

/// Tickers that are known to trade on the stream
pub const KNOWN_TICKERS: &[&str] = &[
    "SOL", "USDC", "USD", "WLFI", "COIN", "MROCKS", "OTC", "KAIROS", "EMULITES", "LYN", "FINANCE",
    "SHOT", "HOPE", "AA", "EA", "FA", "PEPE", "DOGE", "SHIB", "BONK",
];

/// Uppercase words that show up in protocol noise rather than as tickers
const UPPERCASE_BLACKLIST: &[&str] = &[
    "HTTP", "HTTPS", "GET", "POST", "PUT", "DELETE", "JSON", "XML", "HTML", "CSS", "JS", "API",
    "URL", "URI", "TCP", "UDP", "DNS", "SSL", "TLS", "UTF", "ASCII", "BASE", "TRUE", "FALSE",
    "NULL", "VOID", "INT", "FLOAT", "DOUBLE", "STRING", "CHAR", "BYTE", "BOOL", "ARRAY", "OBJECT",
    "ERROR", "WSS", "WS",
];

/// Capitalised words that are almost never token names
const COMMON_WORDS: &[&str] = &[
    "The", "And", "For", "With", "From", "This", "That", "Token", "Name", "Symbol", "Pair",
    "Price", "Volume", "Liquidity", "Market", "Solana", "Pump", "Swap", "Http", "Https", "True",
    "False", "None", "Null",
];

const WHITELIST_CONFIDENCE: f64 = 0.95;
const DOLLAR_CONFIDENCE: f64 = 0.9;
const CONTEXT_CONFIDENCE: f64 = 0.8;
const UPPERCASE_CONFIDENCE: f64 = 0.7;
const UPPERCASE_REPEAT_CEILING: f64 = 0.9;
const MIXED_CASE_CONFIDENCE: f64 = 0.5;

/// Ranking score used when choosing a symbol for a record
pub fn score(candidate: &SymbolCandidate) -> f64 {
    let frequency_bonus = if candidate.frequency > 1 {
        (0.02 * f64::from(candidate.frequency)).min(0.2)
    } else {
        0.0
    };

    let source_bonus = match candidate.source {
        SymbolSource::Whitelisted => 0.5,
        SymbolSource::DollarPrefixed => 0.3,
        SymbolSource::ContextBased => 0.2,
        SymbolSource::Uppercase => 0.1,
        SymbolSource::MixedCase => 0.0,
    };

    candidate.confidence + frequency_bonus + source_bonus
}

/// Best usable symbol among `candidates`, upper-cased
///
/// Only 2 to 10 alphanumeric characters qualify. Ties go to the earlier
/// candidate.
pub fn best_symbol<'a>(candidates: impl IntoIterator<Item = &'a SymbolCandidate>) -> Option<String> {
    candidates
        .into_iter()
        .filter(|c| is_usable(&c.symbol))
        .fold(None::<(&SymbolCandidate, f64)>, |best, candidate| {
            let candidate_score = score(candidate);
            match best {
                Some((_, best_score)) if best_score >= candidate_score => best,
                _ => Some((candidate, candidate_score)),
            }
        })
        .map(|(candidate, _)| candidate.symbol.to_ascii_uppercase())
}

fn is_usable(symbol: &str) -> bool {
    (2..=10).contains(&symbol.len()) && symbol.chars().all(|c| c.is_ascii_alphanumeric())
}

#[derive(Debug, Clone)]
pub struct SymbolExtractor {
    uppercase: Regex,
    dollar: Regex,
    context: Regex,
    mixed_case: Regex,
    max_symbols: usize,
}

impl SymbolExtractor {
    pub fn new(config: &ExtractionConfig) -> ExtractionResult<Self> {
        Ok(Self {
            uppercase: compile(r"\b[A-Z]{2,10}\b")?,
            dollar: compile(r"\$([A-Za-z][A-Za-z0-9]{1,9})\b")?,
            context: compile(r"(?i:symbol|name|token)[:\s]*([A-Z][A-Z0-9]{1,9})\b")?,
            mixed_case: compile(r"\b[A-Z][a-z]{2,15}\b")?,
            max_symbols: config.max_symbols,
        })
    }

    /// Symbol candidates in `bytes`, highest confidence first
    pub fn extract(&self, bytes: &[u8], base_offset: usize) -> Vec<SymbolCandidate> {
        let text = printable_projection(bytes);
        let mut found = Found::default();

        for m in self.uppercase.find_iter(&text) {
            if UPPERCASE_BLACKLIST.contains(&m.as_str()) {
                continue;
            }
            let source = if KNOWN_TICKERS.contains(&m.as_str()) {
                SymbolSource::Whitelisted
            } else {
                SymbolSource::Uppercase
            };
            found.record(m.as_str(), base_offset + m.start(), source);
        }

        for caps in self.dollar.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                found.record(m.as_str(), base_offset + m.start(), SymbolSource::DollarPrefixed);
            }
        }

        for caps in self.context.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                found.record(m.as_str(), base_offset + m.start(), SymbolSource::ContextBased);
            }
        }

        for m in self.mixed_case.find_iter(&text) {
            if !COMMON_WORDS.contains(&m.as_str()) {
                found.record(m.as_str(), base_offset + m.start(), SymbolSource::MixedCase);
            }
        }

        let mut candidates = found.into_candidates();
        candidates.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then(a.byte_offset.cmp(&b.byte_offset))
        });
        candidates.truncate(self.max_symbols);
        candidates
    }
}

/// Occurrences per (symbol, source), in first-seen order
#[derive(Default)]
struct Found {
    order: Vec<(String, SymbolSource)>,
    seen: HashMap<(String, SymbolSource), (usize, u32)>,
}

impl Found {
    fn record(&mut self, symbol: &str, offset: usize, source: SymbolSource) {
        let key = (symbol.to_string(), source);
        match self.seen.get_mut(&key) {
            Some((_, count)) => *count += 1,
            None => {
                self.order.push(key.clone());
                self.seen.insert(key, (offset, 1));
            }
        }
    }

    fn into_candidates(mut self) -> Vec<SymbolCandidate> {
        let mut best: Vec<SymbolCandidate> = Vec::new();

        for key in self.order {
            let Some((byte_offset, frequency)) = self.seen.remove(&key) else {
                continue;
            };
            let (symbol, source) = key;
            let candidate = SymbolCandidate {
                byte_offset,
                confidence: base_confidence(source, frequency),
                symbol,
                source,
                frequency,
            };

            // One candidate per symbol; the most confident strategy wins
            match best.iter_mut().find(|c| c.symbol == candidate.symbol) {
                Some(existing) if existing.confidence >= candidate.confidence => {
                    existing.frequency = existing.frequency.max(candidate.frequency);
                }
                Some(existing) => {
                    let frequency = existing.frequency.max(candidate.frequency);
                    *existing = SymbolCandidate {
                        frequency,
                        ..candidate
                    };
                }
                None => best.push(candidate),
            }
        }

        best
    }
}

fn base_confidence(source: SymbolSource, frequency: u32) -> f64 {
    match source {
        SymbolSource::Whitelisted => WHITELIST_CONFIDENCE,
        SymbolSource::DollarPrefixed => DOLLAR_CONFIDENCE,
        SymbolSource::ContextBased => CONTEXT_CONFIDENCE,
        SymbolSource::Uppercase if frequency > 1 => {
            (UPPERCASE_CONFIDENCE + 0.05 * f64::from(frequency)).min(UPPERCASE_REPEAT_CEILING)
        }
        SymbolSource::Uppercase => UPPERCASE_CONFIDENCE,
        SymbolSource::MixedCase => MIXED_CASE_CONFIDENCE,
    }
}
