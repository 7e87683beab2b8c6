use log::debug;

use crate::errors::SyncError;
use crate::xhtml_document::{RunSlot, TextRun, XhtmlDocument};

// @module: In-place word tokenization of content documents

/// Sequential counters threaded through the whole selected document set.
///
/// Word ids are global: strictly increasing in reading order across every
/// document of a run, with no gaps and no repeats. The struct is passed by
/// mutable reference down the call chain; there is no process-wide state.
#[derive(Debug)]
pub struct SyncState {
    next_word_id: usize,
}

impl SyncState {
    /// Start a fresh run with word ids from 1
    pub fn new() -> Self {
        SyncState { next_word_id: 1 }
    }

    /// Allocate the next global word id
    pub fn allocate_word_id(&mut self) -> usize {
        let id = self.next_word_id;
        self.next_word_id += 1;
        id
    }

    /// The id the next created word will receive
    pub fn next_word_id(&self) -> usize {
        self.next_word_id
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrites a content document so every whitespace-delimited token becomes
/// an individually addressable inline span
pub struct WordTokenizer;

impl WordTokenizer {
    /// Tokenize every text run under the document body, in reading order.
    ///
    /// Each token is wrapped in a `<span id="w{n}">` spliced into the tree
    /// at the token's position; surrounding whitespace is reattached so the
    /// rendered text round-trips exactly:
    /// - whitespace before the first token stays at the run's attachment
    ///   point (element leading text or sibling trailing text),
    /// - whitespace between tokens becomes the previous span's trailing text,
    /// - whitespace after the last token becomes the final span's trailing
    ///   text.
    /// Pure-whitespace runs are left untouched and produce no words.
    /// Escaped whitespace references (`&nbsp;`, `&#160;`, `&#xA0;`) separate
    /// words like literal whitespace and stay in the reattached gaps.
    ///
    /// Returns the ordered list of word ids created for this document.
    pub fn tokenize(
        document: &mut XhtmlDocument,
        state: &mut SyncState,
    ) -> Result<Vec<usize>, SyncError> {
        let runs = document.body_text_runs()?;
        let mut word_ids = Vec::new();

        for run in runs {
            let tokens = split_tokens(&run.text);
            if tokens.is_empty() {
                continue;
            }
            Self::tokenize_run(document, &run, &tokens, state, &mut word_ids)?;
        }

        debug!(
            "Tokenized '{}': {} words, next global id {}",
            document.stem,
            word_ids.len(),
            state.next_word_id()
        );
        Ok(word_ids)
    }

    /// Splice one run's word spans into the tree
    fn tokenize_run(
        document: &mut XhtmlDocument,
        run: &TextRun,
        tokens: &[(usize, usize)],
        state: &mut SyncState,
        word_ids: &mut Vec<usize>,
    ) -> Result<(), SyncError> {
        let text = run.text.as_str();

        // Whitespace strictly before the first token stays at the
        // attachment point; the original character data is replaced
        let leading = non_empty(&text[..tokens[0].0]);
        match run.slot {
            RunSlot::LeadingOf(element) => document.set_text(element, leading),
            RunSlot::TrailingOf(sibling) => document.set_tail(sibling, leading),
        }

        let mut previous: Option<usize> = None;
        for (i, &(start, end)) in tokens.iter().enumerate() {
            let gap_end = tokens.get(i + 1).map_or(text.len(), |next| next.0);
            let trailing = non_empty(&text[end..gap_end]);

            let word_id = state.allocate_word_id();
            let span = document.new_word_span(word_id, &text[start..end], trailing);

            match previous {
                None => match run.slot {
                    RunSlot::LeadingOf(element) => document.insert_first_child(element, span),
                    RunSlot::TrailingOf(sibling) => document.insert_after(sibling, span)?,
                },
                Some(prev_span) => document.insert_after(prev_span, span)?,
            }

            previous = Some(span);
            word_ids.push(word_id);
        }

        Ok(())
    }
}

/// Escaped references that denote whitespace characters. Character data is
/// kept in serialized form, so a non-breaking space arrives here as one of
/// these instead of U+00A0; it must still separate words.
const WHITESPACE_ENTITIES: [&str; 4] = ["&nbsp;", "&#160;", "&#xA0;", "&#xa0;"];

/// Byte ranges of the whitespace-delimited tokens of a string.
///
/// Literal whitespace and escaped whitespace references both end a token.
fn split_tokens(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    while offset < text.len() {
        let rest = &text[offset..];
        let separator_len = WHITESPACE_ENTITIES
            .iter()
            .find(|entity| rest.starts_with(*entity))
            .map(|entity| entity.len())
            .or_else(|| {
                let ch = rest.chars().next()?;
                ch.is_whitespace().then(|| ch.len_utf8())
            });

        match separator_len {
            Some(len) => {
                if let Some(begin) = start.take() {
                    tokens.push((begin, offset));
                }
                offset += len;
            }
            None => {
                if start.is_none() {
                    start = Some(offset);
                }
                offset += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    if let Some(begin) = start {
        tokens.push((begin, text.len()));
    }

    tokens
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
