use log::debug;

use crate::page_range::PageRangeSet;

// @module: Content document selection by inferred page number

/// Filters an ordered collection of content document stems down to the ones
/// selected by a page range set
pub struct DocumentSelector;

impl DocumentSelector {
    /// Infer a page number from a file stem.
    ///
    /// Uses the first maximal run of consecutive ASCII digits, so
    /// `chapter3_v2` yields 3 and `page012` yields 12. Stems with no digits
    /// are unnumbered and return None.
    pub fn extract_page_number(stem: &str) -> Option<u64> {
        let start = stem.find(|c: char| c.is_ascii_digit())?;
        let digits: &str = &stem[start..];
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end].parse().ok()
    }

    /// Select the stems to process.
    ///
    /// A document is included iff it is unnumbered or its page number falls
    /// inside the range set. The result is sorted lexicographically by stem,
    /// the book's reading order convention - callers must keep stems
    /// zero-padded (or otherwise lexicographically ordered) to match true
    /// reading order, since no spine is consulted here.
    pub fn select(stems: &[String], ranges: &PageRangeSet) -> Vec<String> {
        let mut selected: Vec<String> = stems
            .iter()
            .filter(|stem| match Self::extract_page_number(stem) {
                Some(page) => ranges.contains(page),
                None => true,
            })
            .cloned()
            .collect();
        selected.sort();

        debug!("Selected {} of {} content documents", selected.len(), stems.len());
        selected
    }
}
