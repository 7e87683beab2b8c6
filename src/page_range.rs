use std::fmt;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Page range parsing and membership queries

// @const: Accepted range term pattern - digits with optional underscores,
// one optional dash for a range
static RANGE_TERM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(_\d+)*(-\d+(_\d+)*)?$").unwrap()
});

/// A closed, inclusive interval of page numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    // @field: Lowest page in the range (inclusive)
    pub low: u64,

    // @field: Highest page in the range (inclusive)
    pub high: u64,
}

impl PageRange {
    /// Create a range, swapping the bounds if given in descending order
    pub fn new(a: u64, b: u64) -> Self {
        if a <= b {
            PageRange { low: a, high: b }
        } else {
            PageRange { low: b, high: a }
        }
    }

    /// Whether the page falls inside this range
    pub fn contains(&self, page: u64) -> bool {
        page >= self.low && page <= self.high
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// A minimal sorted set of disjoint page ranges.
///
/// The stored ranges are pairwise non-overlapping, non-adjacent (any two are
/// separated by at least one excluded page) and sorted ascending. The empty
/// set is special: it means "no restriction", so `contains` answers true for
/// every page. That asymmetry is the documented default - an empty or
/// entirely invalid range spec selects the whole book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRangeSet {
    ranges: Vec<PageRange>,
}

impl PageRangeSet {
    /// Parse a comma-separated range spec like `1,2,5-8`.
    ///
    /// Each term is a single page `N` or a range `A-B` (order-independent).
    /// Underscores are permitted inside a number group and ignored for its
    /// value. Terms that do not match the accepted pattern are skipped with
    /// a warning; parsing never aborts.
    pub fn parse(spec: &str) -> Self {
        let mut set = PageRangeSet::default();
        for term in spec.split(',').map(str::trim) {
            match Self::parse_term(term) {
                Some(range) => set.insert(range),
                None => warn!("Ignored invalid range '{}'", term),
            }
        }
        set
    }

    /// Parse one term into a range, or None if it is not accepted
    fn parse_term(term: &str) -> Option<PageRange> {
        if !RANGE_TERM_REGEX.is_match(term) {
            return None;
        }
        let mut bounds = term.split('-');
        let a = Self::parse_page_group(bounds.next()?)?;
        let b = match bounds.next() {
            Some(group) => Self::parse_page_group(group)?,
            None => a, // single page: range end = start
        };
        Some(PageRange::new(a, b))
    }

    /// Parse a digit group, dropping cosmetic underscores
    fn parse_page_group(group: &str) -> Option<u64> {
        group.replace('_', "").parse().ok()
    }

    /// Insert a range, merging it with every stored range it overlaps or
    /// touches so the set invariant holds
    fn insert(&mut self, new: PageRange) {
        let mut merged = new;
        let mut result = Vec::with_capacity(self.ranges.len() + 1);
        let mut placed = false;

        for &range in &self.ranges {
            if range.high.saturating_add(1) < merged.low {
                // Strictly before the new range, not even adjacent
                result.push(range);
            } else if merged.high.saturating_add(1) < range.low {
                // Strictly after: the merged range is complete
                if !placed {
                    result.push(merged);
                    placed = true;
                }
                result.push(range);
            } else {
                // Overlapping or adjacent: absorb into the union
                merged.low = merged.low.min(range.low);
                merged.high = merged.high.max(range.high);
            }
        }
        if !placed {
            result.push(merged);
        }

        self.ranges = result;
    }

    /// Membership query. True when the set is empty (no restriction) or the
    /// page falls within some stored range.
    pub fn contains(&self, page: u64) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(page))
    }

    /// Whether the set holds no ranges at all
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The stored ranges, sorted ascending and pairwise disjoint
    pub fn ranges(&self) -> &[PageRange] {
        &self.ranges
    }
}

impl fmt::Display for PageRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", terms.join(","))
    }
}
