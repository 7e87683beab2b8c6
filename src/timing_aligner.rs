use std::io::BufRead;

use log::debug;

use crate::errors::SyncError;
use crate::overlay::{OverlayDocument, SyncPoint};
use crate::timing_source::TimingSource;

// @module: Word-to-audio alignment

/// Assigns timing entries to word units, in order, producing the overlay
/// document for one content document
pub struct TimingAligner;

impl TimingAligner {
    /// Align one document's words against the shared timing cursor.
    ///
    /// Pops exactly one timing entry per word id; the cursor is shared and
    /// advanced across the whole selected document set, never reset per
    /// document. Fails with `AlignmentExhausted` the moment the source has
    /// fewer entries than words - the caller treats that as fatal for the
    /// whole run.
    pub fn align<R: BufRead>(
        stem: &str,
        word_ids: &[usize],
        timing: &mut TimingSource<R>,
        audio_file: &str,
    ) -> Result<OverlayDocument, SyncError> {
        let mut overlay = OverlayDocument::new(stem, audio_file);

        for &word_id in word_ids {
            let entry = timing.next_entry()?.ok_or_else(|| SyncError::AlignmentExhausted {
                stem: stem.to_string(),
                word_id,
                cursor: timing.cursor(),
            })?;

            overlay.points.push(SyncPoint {
                word_id,
                text_ref: format!("../text/{stem}.xhtml#w{word_id}"),
                clip_begin: entry.clip_begin,
                clip_end: entry.clip_end,
            });
        }

        debug!(
            "Aligned '{}': {} sync points, timing cursor now {}",
            stem,
            overlay.points.len(),
            timing.cursor()
        );
        Ok(overlay)
    }
}
