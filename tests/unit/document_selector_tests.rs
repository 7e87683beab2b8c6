/*!
 * Tests for content document selection
 */

use readalong::document_selector::DocumentSelector;
use readalong::page_range::PageRangeSet;

/// Test page number inference from file stems
#[test]
fn test_extract_page_number_withVariousStems_shouldUseFirstDigitRun() {
    assert_eq!(DocumentSelector::extract_page_number("page1"), Some(1));
    assert_eq!(DocumentSelector::extract_page_number("page012"), Some(12));
    assert_eq!(DocumentSelector::extract_page_number("chapter3_v2"), Some(3));
    assert_eq!(DocumentSelector::extract_page_number("12_intro"), Some(12));
    assert_eq!(DocumentSelector::extract_page_number("cover"), None);
    assert_eq!(DocumentSelector::extract_page_number(""), None);
}

/// Test selection against a restricted range set
#[test]
fn test_select_withRestrictedRange_shouldFilterNumberedPages() {
    let stems = vec![
        "page3".to_string(),
        "page1".to_string(),
        "page2".to_string(),
        "cover".to_string(),
    ];
    let ranges = PageRangeSet::parse("1-2");

    let selected = DocumentSelector::select(&stems, &ranges);
    assert_eq!(selected, vec!["cover", "page1", "page2"]);
}

/// Test that unnumbered documents are always included
#[test]
fn test_select_withUnnumberedStem_shouldAlwaysInclude() {
    let stems = vec!["notes".to_string(), "page9".to_string()];
    let ranges = PageRangeSet::parse("1");

    let selected = DocumentSelector::select(&stems, &ranges);
    assert_eq!(selected, vec!["notes"]);
}

/// Test that an empty range set selects everything, sorted by stem
#[test]
fn test_select_withEmptyRangeSet_shouldSelectAllSorted() {
    let stems = vec![
        "page10".to_string(),
        "page02".to_string(),
        "page01".to_string(),
    ];
    let ranges = PageRangeSet::parse("");

    let selected = DocumentSelector::select(&stems, &ranges);
    assert_eq!(selected, vec!["page01", "page02", "page10"]);
}
