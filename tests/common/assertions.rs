//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use std::path::Path;

use jpegfit::models::{FileReport, FileStatus, SearchOutcome};

/// Split a binary PPM into `(width, height)` and its RGB payload.
pub fn ppm_parts(ppm: &[u8]) -> ((u32, u32), &[u8]) {
    let mut fields = Vec::new();
    let mut pos = 0;
    while fields.len() < 4 {
        let start = pos;
        while !ppm[pos].is_ascii_whitespace() {
            pos += 1;
        }
        fields.push(std::str::from_utf8(&ppm[start..pos]).unwrap().to_string());
        pos += 1;
    }
    assert_eq!(fields[0], "P6", "not a binary PPM");
    assert_eq!(fields[3], "255", "unexpected maxval");
    let dims = (fields[1].parse().unwrap(), fields[2].parse().unwrap());
    (dims, &ppm[pos..])
}

/// Assert the report is a compressed result and return its outcome.
pub fn assert_compressed(report: &FileReport) -> SearchOutcome {
    match &report.status {
        FileStatus::Compressed { outcome, .. } => *outcome,
        other => panic!(
            "Expected compressed result for {}, got {:?}",
            report.source.display(),
            other
        ),
    }
}

/// Assert `path` holds exactly `len` bytes.
pub fn assert_file_len(path: &Path, len: usize) {
    let meta = std::fs::metadata(path)
        .unwrap_or_else(|e| panic!("Expected output at {}: {}", path.display(), e));
    assert_eq!(meta.len(), len as u64, "size of {}", path.display());
}
