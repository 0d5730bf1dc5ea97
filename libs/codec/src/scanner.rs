//! Numeric scanner: every plausible number in a byte slice
//!
//! The wire format gives no alignment guarantees, so doubles and floats are
//! decoded at every byte offset. A read that is off by one byte yields a
//! different number, never an error, which is why filtering happens on value
//! plausibility rather than on position. Unsigned integers are only read at
//! 4-byte aligned offsets relative to the start of the slice.

use crate::classifier::ValueClassifier;
use crate::config::ExtractionConfig;
use byteorder::{ByteOrder, LittleEndian};
use types::{ClassifiedField, Encoding, NumericCandidate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericScanner {
    ceiling: f64,
    floor: f64,
}

impl Default for NumericScanner {
    fn default() -> Self {
        Self::new(1e12, 1e-10)
    }
}

impl NumericScanner {
    pub fn new(ceiling: f64, floor: f64) -> Self {
        Self { ceiling, floor }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.value_ceiling, config.value_floor)
    }

    /// Decodes every candidate in `bytes`, ordered by offset
    ///
    /// `base_offset` is added to every reported offset so callers scanning a
    /// sub-slice still get absolute frame positions. Within one offset the
    /// order is f64, f32, u32.
    pub fn scan(&self, bytes: &[u8], base_offset: usize) -> Vec<NumericCandidate> {
        let mut candidates = Vec::new();

        for offset in 0..bytes.len() {
            let rest = &bytes[offset..];
            let absolute = base_offset + offset;

            if rest.len() >= 8 {
                let value = LittleEndian::read_f64(rest);
                if self.accepts_float(value) {
                    candidates.push(NumericCandidate::new(absolute, value, Encoding::F64));
                }
            }

            if rest.len() >= 4 {
                let value = f64::from(LittleEndian::read_f32(rest));
                if self.accepts_float(value) {
                    candidates.push(NumericCandidate::new(absolute, value, Encoding::F32));
                }

                if offset % 4 == 0 {
                    let value = f64::from(LittleEndian::read_u32(rest));
                    if value < self.ceiling {
                        candidates.push(NumericCandidate::new(absolute, value, Encoding::U32));
                    }
                }
            }
        }

        candidates
    }

    /// Scans and classifies, keeping only candidates that matched a field kind
    pub fn scan_window(
        &self,
        bytes: &[u8],
        base_offset: usize,
        classifier: &ValueClassifier,
    ) -> Vec<ClassifiedField> {
        self.scan(bytes, base_offset)
            .into_iter()
            .map(|candidate| classifier.classify(candidate))
            .filter(|field| field.kind.is_classified())
            .collect()
    }

    /// Exact 1.0 and near-zero magnitudes are padding patterns, not data
    fn accepts_float(&self, value: f64) -> bool {
        value.is_finite()
            && value.abs() < self.ceiling
            && value.abs() > self.floor
            && value != 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    #[test]
    fn test_zeros_produce_only_integers() {
        let scanner = NumericScanner::default();
        let candidates = scanner.scan(&[0u8; 16], 0);

        assert!(candidates.iter().all(|c| c.encoding == Encoding::U32));
        assert_eq!(candidates.len(), 4);
    }

    #[test]
    fn test_unaligned_double_is_found() {
        let mut bytes = vec![0u8; 3];
        bytes.write_f64::<LittleEndian>(22_000.0).unwrap();
        bytes.extend_from_slice(&[0u8; 5]);

        let candidates = NumericScanner::default().scan(&bytes, 100);
        let found = candidates
            .iter()
            .find(|c| c.encoding == Encoding::F64 && c.value == 22_000.0)
            .unwrap();
        assert_eq!(found.byte_offset, 103);
    }

    #[test]
    fn test_integers_only_at_aligned_offsets() {
        let mut bytes = vec![0u8; 1];
        bytes.write_u32::<LittleEndian>(357).unwrap();
        bytes.extend_from_slice(&[0u8; 3]);

        let candidates = NumericScanner::default().scan(&bytes, 0);
        assert!(!candidates
            .iter()
            .any(|c| c.encoding == Encoding::U32 && c.value == 357.0));
    }

    #[test]
    fn test_rejects_padding_and_non_finite() {
        let mut bytes = Vec::new();
        bytes.write_f64::<LittleEndian>(1.0).unwrap();
        bytes.write_f64::<LittleEndian>(f64::NAN).unwrap();
        bytes.write_f64::<LittleEndian>(f64::INFINITY).unwrap();
        bytes.write_f64::<LittleEndian>(5e12).unwrap();

        let candidates = NumericScanner::default().scan(&bytes, 0);
        assert!(candidates.iter().all(|c| c.value.is_finite()));
        assert!(!candidates.iter().any(|c| c.value == 1.0 && c.encoding.is_float()));
        assert!(!candidates.iter().any(|c| c.value == 5e12));
    }

    #[test]
    fn test_sorted_by_offset() {
        let mut bytes = Vec::new();
        bytes.write_f32::<LittleEndian>(0.00045).unwrap();
        bytes.write_f64::<LittleEndian>(22_000.0).unwrap();
        bytes.write_u32::<LittleEndian>(357).unwrap();

        let candidates = NumericScanner::default().scan(&bytes, 0);
        assert!(candidates
            .windows(2)
            .all(|pair| pair[0].byte_offset <= pair[1].byte_offset));
    }
}
