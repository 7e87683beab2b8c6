/*!
 * Tests for word-to-audio alignment
 */

use std::io::Cursor;

use readalong::errors::SyncError;
use readalong::timing_aligner::TimingAligner;
use readalong::timing_source::TimingSource;

fn source_from(content: &str) -> TimingSource<Cursor<&[u8]>> {
    TimingSource::from_reader(Cursor::new(content.as_bytes()))
}

/// Test that each word id receives the next timing entry in order
#[test]
fn test_align_withEnoughEntries_shouldBindPositionally() {
    let mut timing = source_from("0.0 0.5\n0.5 1.25\n1.25 2.0\n");

    let overlay = TimingAligner::align("page1", &[1, 2, 3], &mut timing, "book.m4a").unwrap();

    assert_eq!(overlay.stem, "page1");
    assert_eq!(overlay.points.len(), 3);
    assert_eq!(overlay.points[0].word_id, 1);
    assert_eq!(overlay.points[0].text_ref, "../text/page1.xhtml#w1");
    assert_eq!(overlay.points[0].clip_begin, "0.0");
    assert_eq!(overlay.points[0].clip_end, "0.5");
    assert_eq!(overlay.points[2].text_ref, "../text/page1.xhtml#w3");
    assert_eq!(overlay.points[2].clip_end, "2.0");
}

/// Test that the shared cursor carries across documents
#[test]
fn test_align_withTwoDocuments_shouldShareTheCursor() {
    let mut timing = source_from("0.0 1.0\n1.0 2.0\n2.0 3.0\n");

    let first = TimingAligner::align("page1", &[1, 2], &mut timing, "book.m4a").unwrap();
    let second = TimingAligner::align("page2", &[3], &mut timing, "book.m4a").unwrap();

    assert_eq!(first.points[1].clip_end, "2.0");
    assert_eq!(second.points[0].clip_begin, "2.0");
    assert_eq!(second.points[0].text_ref, "../text/page2.xhtml#w3");
}

/// Test that running out of entries is fatal and names the word
#[test]
fn test_align_withTooFewEntries_shouldFailExhausted() {
    let mut timing = source_from("0.0 1.0\n");

    let err = TimingAligner::align("page9", &[4, 5], &mut timing, "book.m4a").unwrap_err();
    match err {
        SyncError::AlignmentExhausted { stem, word_id, cursor } => {
            assert_eq!(stem, "page9");
            assert_eq!(word_id, 5);
            assert_eq!(cursor, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Test that a wordless document yields an empty overlay without consuming
#[test]
fn test_align_withNoWords_shouldConsumeNothing() {
    let mut timing = source_from("0.0 1.0\n");

    let overlay = TimingAligner::align("blank", &[], &mut timing, "book.m4a").unwrap();
    assert!(overlay.points.is_empty());
    assert_eq!(timing.cursor(), 1);
}
