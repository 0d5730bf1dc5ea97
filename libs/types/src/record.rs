//! Candidate records: one scan window plus the metadata found around it

use crate::candidates::{ClassifiedField, FieldKind};
use crate::metadata::{MetadataItem, SymbolCandidate};
use std::collections::BTreeMap;

/// Classified fields of a window grouped by kind, each list in offset order
pub type FieldMap = BTreeMap<FieldKind, Vec<ClassifiedField>>;

/// A byte window whose candidates look like one instrument record
///
/// Built by the cluster assembler and consumed once by the profile builder.
/// `window_end - window_start` is always the scan window size.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub window_start: usize,
    pub window_end: usize,
    /// Only classified kinds appear as keys
    pub classified: FieldMap,
    pub nearby_metadata: Vec<MetadataItem>,
    pub nearby_symbols: Vec<SymbolCandidate>,
    pub completeness_score: f64,
}

impl CandidateRecord {
    /// Number of distinct field kinds present
    pub fn field_diversity(&self) -> usize {
        self.classified.values().filter(|fields| !fields.is_empty()).count()
    }

    /// Total classified candidates across all kinds
    pub fn richness(&self) -> usize {
        self.classified.values().map(Vec::len).sum()
    }

    pub fn fields(&self, kind: FieldKind) -> &[ClassifiedField] {
        self.classified
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn span(&self) -> usize {
        self.window_end - self.window_start
    }
}
