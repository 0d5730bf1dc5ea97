//! Value classifier: assigns each numeric candidate exactly one field kind

use crate::range_table::RangeTable;
use types::{ClassifiedField, FieldKind, NumericCandidate};

#[derive(Debug, Clone, Default)]
pub struct ValueClassifier {
    table: RangeTable,
}

impl ValueClassifier {
    pub fn new(table: RangeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    pub fn kind_of(&self, candidate: &NumericCandidate) -> FieldKind {
        self.table.classify(candidate.value, candidate.encoding)
    }

    pub fn classify(&self, candidate: NumericCandidate) -> ClassifiedField {
        ClassifiedField::new(candidate, self.kind_of(&candidate))
    }

    pub fn classify_all(&self, candidates: Vec<NumericCandidate>) -> Vec<ClassifiedField> {
        candidates
            .into_iter()
            .map(|candidate| self.classify(candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Encoding;

    #[test]
    fn test_classify_keeps_candidate() {
        let classifier = ValueClassifier::default();
        let candidate = NumericCandidate::new(42, 18.0, Encoding::F64);
        let field = classifier.classify(candidate);

        assert_eq!(field.kind, FieldKind::MakerCount);
        assert_eq!(field.byte_offset(), 42);
        assert_eq!(field.candidate, candidate);
    }

    #[test]
    fn test_unmatched_is_unclassified() {
        let classifier = ValueClassifier::default();
        let fields = classifier.classify_all(vec![
            NumericCandidate::new(0, 3.5, Encoding::U32),
            NumericCandidate::new(4, 2e8, Encoding::F64),
        ]);
        assert!(fields.iter().all(|f| f.kind == FieldKind::Unclassified));
    }
}
