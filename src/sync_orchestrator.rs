use std::io::BufRead;

use anyhow::Result;
use log::info;

use crate::overlay::OverlayDocument;
use crate::timing_aligner::TimingAligner;
use crate::timing_source::TimingSource;
use crate::word_tokenizer::{SyncState, WordTokenizer};
use crate::xhtml_document::XhtmlDocument;

// @module: Synchronization run over the selected document set

/// One synchronized document: the mutated content tree plus its overlay
#[derive(Debug)]
pub struct DocumentSync {
    // @field: Content document with word spans spliced in
    pub document: XhtmlDocument,

    // @field: Overlay linking each word span to its clip range
    pub overlay: OverlayDocument,
}

/// Drives tokenization and alignment over the selected documents in page
/// order, threading the single global word-id counter and timing cursor
pub struct SyncOrchestrator;

impl SyncOrchestrator {
    /// Run the synchronization engine over the whole selected set.
    ///
    /// Documents must arrive in reading order; timing entries bind to words
    /// purely by position, so reordering documents changes every binding
    /// after the first difference. All-or-nothing at the book level: the
    /// first alignment failure aborts the run and nothing is returned for
    /// documents already processed.
    pub fn run<R: BufRead>(
        documents: Vec<XhtmlDocument>,
        timing: &mut TimingSource<R>,
        audio_file: &str,
    ) -> Result<Vec<DocumentSync>> {
        let mut state = SyncState::new();
        let mut results = Vec::with_capacity(documents.len());

        for mut document in documents {
            let word_ids = WordTokenizer::tokenize(&mut document, &mut state)?;
            let overlay = TimingAligner::align(&document.stem, &word_ids, timing, audio_file)?;
            results.push(DocumentSync { document, overlay });
        }

        info!(
            "Synchronized {} documents, {} words total",
            results.len(),
            state.next_word_id() - 1
        );
        Ok(results)
    }
}
