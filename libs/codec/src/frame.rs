//! Frame locator
//!
//! A frame optionally opens with a version header, `0x00 '\n' <version> '\n'`,
//! and carries its records after a marker string. The data section starts a
//! fixed number of bytes after the start of the first marker occurrence.

use crate::config::ExtractionConfig;
use crate::error::{ExtractionError, ExtractionResult};
use tracing::warn;

/// The data section of a frame with its absolute position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSection<'a> {
    pub bytes: &'a [u8],
    /// Offset of `bytes[0]` within the frame
    pub base_offset: usize,
    pub marker_offset: usize,
    pub version: Option<String>,
}

/// Version string from the frame header, if the frame has one
pub fn frame_version(frame: &[u8]) -> Option<String> {
    let rest = frame.strip_prefix(b"\x00\n")?;
    let end = rest.iter().position(|&b| b == b'\n')?;
    Some(String::from_utf8_lossy(&rest[..end]).into_owned())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn locate_data_section<'a>(
    frame: &'a [u8],
    config: &ExtractionConfig,
) -> ExtractionResult<DataSection<'a>> {
    let version = frame_version(frame);
    if let Some(found) = &version {
        if *found != config.expected_version {
            warn!(
                expected = %config.expected_version,
                found = %found,
                "Frame version differs from the calibrated version, extraction may drift"
            );
        }
    }

    let marker_offset =
        find(frame, config.marker.as_bytes()).ok_or_else(|| ExtractionError::MarkerNotFound {
            marker: config.marker.clone(),
            frame_len: frame.len(),
        })?;

    let data_start = marker_offset + config.marker_skip;
    if data_start > frame.len() {
        return Err(ExtractionError::TruncatedSection {
            marker_offset,
            data_start,
            frame_len: frame.len(),
        });
    }

    Ok(DataSection {
        bytes: &frame[data_start..],
        base_offset: data_start,
        marker_offset,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_header() {
        assert_eq!(frame_version(b"\x00\n1.3.0\npairs"), Some("1.3.0".to_string()));
        assert_eq!(frame_version(b"\x00\n1.3.0"), None);
        assert_eq!(frame_version(b"pairs"), None);
    }

    #[test]
    fn test_locates_section_after_marker() {
        let mut frame = b"\x00\n1.3.0\n".to_vec();
        frame.extend_from_slice(b"pairs");
        frame.extend_from_slice(&[0xAA; 15]);
        frame.extend_from_slice(b"DATA");

        let section = locate_data_section(&frame, &ExtractionConfig::default()).unwrap();
        assert_eq!(section.marker_offset, 8);
        assert_eq!(section.base_offset, 28);
        assert_eq!(section.bytes, b"DATA");
        assert_eq!(section.version.as_deref(), Some("1.3.0"));
    }

    #[test]
    fn test_version_drift_still_extracts() {
        let mut frame = b"\x00\n2.0.0\npairs".to_vec();
        frame.extend_from_slice(&[0u8; 30]);
        let section = locate_data_section(&frame, &ExtractionConfig::default()).unwrap();
        assert_eq!(section.version.as_deref(), Some("2.0.0"));
        assert_eq!(section.bytes.len(), 15);
    }

    #[test]
    fn test_errors() {
        let config = ExtractionConfig::default();
        assert!(matches!(
            locate_data_section(b"no marker here", &config),
            Err(ExtractionError::MarkerNotFound { frame_len: 14, .. })
        ));
        assert!(matches!(
            locate_data_section(b"xxpairs", &config),
            Err(ExtractionError::TruncatedSection { marker_offset: 2, data_start: 22, .. })
        ));
        assert!(matches!(
            locate_data_section(b"", &config),
            Err(ExtractionError::MarkerNotFound { .. })
        ));
    }
}
