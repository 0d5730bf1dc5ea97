//! Profile builder: candidate record to token profile
//!
//! Purely structural. Confidence is the record's completeness score passed
//! through unchanged.
//!
//! Percent changes are assigned to 5m, 1h, 6h and 24h by ascending offset.
//! That ordering has only been observed, never confirmed against a labelled
//! frame.

use crate::config::ExtractionConfig;
use crate::symbols::best_symbol;
use types::{AddressKind, CandidateRecord, FieldKind, MetadataKind, TokenProfile, UrlKind};

#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    min_fields: u32,
    chain: String,
}

impl ProfileBuilder {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_fields: config.min_profile_fields,
            chain: config.chain.clone(),
        }
    }

    /// Builds a profile, or `None` when fewer than the minimum fields are populated
    pub fn build(
        &self,
        record: &CandidateRecord,
        fallback_index: usize,
        timestamp: i64,
    ) -> Option<TokenProfile> {
        let mut profile = TokenProfile {
            record_position: record.window_start,
            record_span: record.span(),
            timestamp,
            confidence_score: record.completeness_score,
            ..Default::default()
        };

        self.apply_numeric(record, &mut profile);
        self.apply_metadata(record, &mut profile);

        profile.symbol = Some(
            best_symbol(&record.nearby_symbols)
                .unwrap_or_else(|| format!("UNKNOWN_{fallback_index:02}")),
        );

        profile.field_count = profile.populated_field_count();
        if profile.field_count < self.min_fields {
            return None;
        }
        Some(profile)
    }

    fn apply_numeric(&self, record: &CandidateRecord, profile: &mut TokenProfile) {
        let first = |kind: FieldKind| record.fields(kind).first().map(|f| f.value());
        let max = |kind: FieldKind| {
            record
                .fields(kind)
                .iter()
                .map(|f| f.value())
                .max_by(f64::total_cmp)
        };

        profile.price = first(FieldKind::Price);
        profile.volume_24h = max(FieldKind::Volume);
        profile.makers = max(FieldKind::MakerCount).map(|v| v as u64);
        profile.txns_24h = record
            .fields(FieldKind::TxCount)
            .iter()
            .map(|f| f.value() as u64)
            .max();
        profile.liquidity = first(FieldKind::Liquidity);
        profile.market_cap = first(FieldKind::MarketCap);

        let mut changes = record.fields(FieldKind::PercentChange).iter().map(|f| f.value());
        profile.change_5m = changes.next();
        profile.change_1h = changes.next();
        profile.change_6h = changes.next();
        profile.change_24h = changes.next();
    }

    fn apply_metadata(&self, record: &CandidateRecord, profile: &mut TokenProfile) {
        for item in &record.nearby_metadata {
            match item.kind {
                MetadataKind::Address(AddressKind::SolToken) => {
                    profile.quote_address.get_or_insert_with(|| item.text.clone());
                }
                MetadataKind::Address(_) => {
                    if profile.pair_address.is_none() {
                        profile.pair_address = Some(item.text.clone());
                    } else if profile.creator_address.is_none()
                        && profile.pair_address.as_deref() != Some(item.text.as_str())
                    {
                        profile.creator_address = Some(item.text.clone());
                    }
                }
                MetadataKind::Url(UrlKind::Twitter) => {
                    profile.twitter.get_or_insert_with(|| item.text.clone());
                }
                MetadataKind::Url(UrlKind::Website) => {
                    profile.website.get_or_insert_with(|| item.text.clone());
                }
                MetadataKind::Url(UrlKind::Telegram) => {
                    profile.telegram.get_or_insert_with(|| item.text.clone());
                }
                MetadataKind::Url(UrlKind::Unknown) => {}
                MetadataKind::Protocol => {
                    if profile.protocol.is_none() {
                        profile.protocol = Some(item.text.clone());
                        profile.chain = Some(self.chain.clone());
                    }
                }
                MetadataKind::AgeIndicator => {
                    profile.pair_age.get_or_insert_with(|| item.text.clone());
                }
            }
        }
    }
}
