//! Cluster assembler: sliding windows to candidate records
//!
//! A window is accepted when its classified fields cover enough distinct
//! kinds. Accepted windows overlap heavily (stride < window size), so the
//! richest windows are kept greedily and anything touching a kept window is
//! dropped. Each byte region therefore contributes at most one record.

use crate::classifier::ValueClassifier;
use crate::config::ExtractionConfig;
use crate::error::ExtractionResult;
use crate::metadata::MetadataExtractor;
use crate::scanner::NumericScanner;
use crate::symbols::SymbolExtractor;
use tracing::debug;
use types::{CandidateRecord, FieldMap, MetadataItem, MetadataKind, SymbolCandidate};

/// An accepted window before overlap resolution
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCluster {
    pub window_start: usize,
    pub window_end: usize,
    pub classified: FieldMap,
}

impl WindowCluster {
    pub fn richness(&self) -> usize {
        self.classified.values().map(Vec::len).sum()
    }

    pub fn diversity(&self) -> usize {
        self.classified.values().filter(|f| !f.is_empty()).count()
    }

    /// Half-open ranges; touching end to start is not an overlap
    pub fn overlaps(&self, other: &WindowCluster) -> bool {
        self.window_start < other.window_end && other.window_start < self.window_end
    }
}

/// Keeps the richest non-overlapping clusters, at most `max_clusters`
///
/// Equal richness keeps the earlier window.
pub fn resolve_overlaps(mut clusters: Vec<WindowCluster>, max_clusters: usize) -> Vec<WindowCluster> {
    clusters.sort_by(|a, b| b.richness().cmp(&a.richness()));

    let mut kept: Vec<WindowCluster> = Vec::new();
    for cluster in clusters {
        if kept.len() >= max_clusters {
            break;
        }
        if !kept.iter().any(|k| k.overlaps(&cluster)) {
            kept.push(cluster);
        }
    }
    kept
}

/// Numeric diversity dominates at 60%, each metadata family adds 10%
pub fn completeness_score(diversity: usize, metadata: &[MetadataItem]) -> f64 {
    let numeric = (diversity * 10).min(60) as f64 / 100.0;

    let families: [fn(&MetadataKind) -> bool; 4] = [
        MetadataKind::is_address,
        MetadataKind::is_url,
        |kind| matches!(kind, MetadataKind::Protocol),
        |kind| matches!(kind, MetadataKind::AgeIndicator),
    ];
    let textual = families
        .iter()
        .filter(|family| metadata.iter().any(|item| family(&item.kind)))
        .count() as f64
        * 0.1;

    (numeric + textual).min(1.0)
}

#[derive(Debug, Clone)]
pub struct ClusterAssembler {
    scanner: NumericScanner,
    classifier: ValueClassifier,
    metadata: MetadataExtractor,
    symbols: SymbolExtractor,
    window_size: usize,
    stride: usize,
    min_field_kinds: usize,
    metadata_distance: usize,
    max_clusters: usize,
}

impl ClusterAssembler {
    pub fn new(config: &ExtractionConfig) -> ExtractionResult<Self> {
        Ok(Self {
            scanner: NumericScanner::from_config(config),
            classifier: ValueClassifier::new(config.ranges.clone()),
            metadata: MetadataExtractor::new(config)?,
            symbols: SymbolExtractor::new(config)?,
            window_size: config.window_size,
            stride: config.stride,
            min_field_kinds: config.min_field_kinds,
            metadata_distance: config.metadata_distance,
            max_clusters: config.max_clusters,
        })
    }

    /// Windows of `data` with enough field diversity, before overlap resolution
    ///
    /// Windows are only produced while a full window fits.
    pub fn candidate_windows(&self, data: &[u8], base_offset: usize) -> Vec<WindowCluster> {
        let mut clusters = Vec::new();
        let mut start = 0;

        while start + self.window_size <= data.len() {
            let window = &data[start..start + self.window_size];
            let window_start = base_offset + start;

            let mut classified = FieldMap::new();
            for field in self.scanner.scan_window(window, window_start, &self.classifier) {
                classified.entry(field.kind).or_default().push(field);
            }

            if classified.len() >= self.min_field_kinds {
                clusters.push(WindowCluster {
                    window_start,
                    window_end: window_start + self.window_size,
                    classified,
                });
            }

            start += self.stride;
        }

        clusters
    }

    /// Candidate records for a data section, most complete first
    pub fn assemble(&self, data: &[u8], base_offset: usize) -> Vec<CandidateRecord> {
        let windows = self.candidate_windows(data, base_offset);
        if windows.is_empty() {
            return Vec::new();
        }

        let accepted = windows.len();
        let kept = resolve_overlaps(windows, self.max_clusters);
        debug!(
            accepted,
            kept = kept.len(),
            "Resolved overlapping candidate windows"
        );

        let metadata = self.metadata.extract(data, base_offset);
        let symbols = self.symbols.extract(data, base_offset);

        let mut records: Vec<CandidateRecord> = kept
            .into_iter()
            .map(|cluster| self.correlate(cluster, &metadata, &symbols))
            .collect();

        records.sort_by(|a, b| b.completeness_score.total_cmp(&a.completeness_score));
        records
    }

    fn correlate(
        &self,
        cluster: WindowCluster,
        metadata: &[MetadataItem],
        symbols: &[SymbolCandidate],
    ) -> CandidateRecord {
        let nearby_metadata: Vec<MetadataItem> = metadata
            .iter()
            .filter(|item| item.distance_to(cluster.window_start) <= self.metadata_distance)
            .cloned()
            .collect();
        let nearby_symbols = symbols
            .iter()
            .filter(|symbol| symbol.distance_to(cluster.window_start) <= self.metadata_distance)
            .cloned()
            .collect();

        let completeness_score = completeness_score(cluster.diversity(), &nearby_metadata);

        CandidateRecord {
            window_start: cluster.window_start,
            window_end: cluster.window_end,
            classified: cluster.classified,
            nearby_metadata,
            nearby_symbols,
            completeness_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{AddressKind, ClassifiedField, Encoding, FieldKind, NumericCandidate, UrlKind};

    fn cluster(start: usize, kinds: &[(FieldKind, usize)]) -> WindowCluster {
        let mut classified = FieldMap::new();
        for &(kind, count) in kinds {
            let fields = (0..count)
                .map(|i| ClassifiedField::new(NumericCandidate::new(start + i, 1.5, Encoding::F64), kind))
                .collect();
            classified.insert(kind, fields);
        }
        WindowCluster {
            window_start: start,
            window_end: start + 500,
            classified,
        }
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = cluster(0, &[]);
        assert!(a.overlaps(&cluster(499, &[])));
        assert!(!a.overlaps(&cluster(500, &[])));
    }

    #[test]
    fn test_resolve_prefers_richer_window() {
        let poorer = cluster(0, &[(FieldKind::Price, 1), (FieldKind::Volume, 2), (FieldKind::TxCount, 2)]);
        let richer = cluster(200, &[(FieldKind::Price, 4), (FieldKind::Volume, 2), (FieldKind::TxCount, 2)]);
        let distant = cluster(800, &[(FieldKind::Price, 1), (FieldKind::Volume, 1), (FieldKind::TxCount, 1)]);

        let kept = resolve_overlaps(vec![poorer, richer, distant], 20);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].window_start, 200);
        assert_eq!(kept[1].window_start, 800);
    }

    #[test]
    fn test_resolve_respects_cap() {
        let clusters = (0..30)
            .map(|i| cluster(i * 500, &[(FieldKind::Price, 1)]))
            .collect();
        assert_eq!(resolve_overlaps(clusters, 20).len(), 20);
    }

    #[test]
    fn test_completeness_weights() {
        assert!((completeness_score(3, &[]) - 0.3).abs() < 1e-9);
        assert!((completeness_score(9, &[]) - 0.6).abs() < 1e-9);

        let metadata = vec![
            MetadataItem::new(0, MetadataKind::Address(AddressKind::Contract), "a"),
            MetadataItem::new(1, MetadataKind::Address(AddressKind::SolToken), "b"),
            MetadataItem::new(2, MetadataKind::Url(UrlKind::Website), "c"),
            MetadataItem::new(3, MetadataKind::Protocol, "pumpfun"),
            MetadataItem::new(4, MetadataKind::AgeIndicator, "1h"),
        ];
        assert!((completeness_score(4, &metadata) - 0.8).abs() < 1e-9);
        assert!((completeness_score(7, &metadata) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_data_has_no_windows() {
        let assembler = ClusterAssembler::new(&ExtractionConfig::default()).unwrap();
        assert!(assembler.candidate_windows(&[0u8; 499], 0).is_empty());
        assert!(assembler.assemble(&[], 0).is_empty());
    }
}
