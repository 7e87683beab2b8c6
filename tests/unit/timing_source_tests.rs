/*!
 * Tests for sequential timing file consumption
 */

use std::io::Cursor;

use readalong::errors::SyncError;
use readalong::timing_source::{TimingEntry, TimingSource};

fn source_from(content: &str) -> TimingSource<Cursor<&[u8]>> {
    TimingSource::from_reader(Cursor::new(content.as_bytes()))
}

/// Test sequential consumption of well-formed lines
#[test]
fn test_next_entry_withWellFormedLines_shouldPopInOrder() {
    let mut source = source_from("0.0 1.25\n1.25 2.0\n");

    assert_eq!(source.cursor(), 1);
    assert_eq!(
        source.next_entry().unwrap(),
        Some(TimingEntry {
            clip_begin: "0.0".to_string(),
            clip_end: "1.25".to_string(),
        })
    );
    assert_eq!(source.cursor(), 2);
    assert_eq!(
        source.next_entry().unwrap(),
        Some(TimingEntry {
            clip_begin: "1.25".to_string(),
            clip_end: "2.0".to_string(),
        })
    );
    assert_eq!(source.next_entry().unwrap(), None);
}

/// Test that values are kept verbatim, trailing zeros included
#[test]
fn test_next_entry_withTrailingZeros_shouldKeepValuesVerbatim() {
    let mut source = source_from("1.50 2.500\n");

    let entry = source.next_entry().unwrap().unwrap();
    assert_eq!(entry.clip_begin, "1.50");
    assert_eq!(entry.clip_end, "2.500");
}

/// Test that extra columns are tolerated
#[test]
fn test_next_entry_withExtraColumns_shouldIgnoreThem() {
    let mut source = source_from("0.0 0.8 hello confidence=0.97\n");

    let entry = source.next_entry().unwrap().unwrap();
    assert_eq!(entry.clip_begin, "0.0");
    assert_eq!(entry.clip_end, "0.8");
}

/// Test that a single-column line is rejected with its position
#[test]
fn test_next_entry_withMissingColumn_shouldFailMalformed() {
    let mut source = source_from("0.0 1.0\n2.5\n");
    source.next_entry().unwrap();

    let err = source.next_entry().unwrap_err();
    match err {
        SyncError::MalformedTimingLine { line, content } => {
            assert_eq!(line, 2);
            assert_eq!(content, "2.5");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Test that non-numeric values are rejected
#[test]
fn test_next_entry_withNonNumericValue_shouldFailMalformed() {
    let mut source = source_from("start end\n");

    let err = source.next_entry().unwrap_err();
    assert!(matches!(err, SyncError::MalformedTimingLine { line: 1, .. }));
}

/// Test that exhaustion is not an error at this level
#[test]
fn test_next_entry_withEmptySource_shouldReturnNone() {
    let mut source = source_from("");
    assert_eq!(source.next_entry().unwrap(), None);
    assert_eq!(source.cursor(), 1);
}
