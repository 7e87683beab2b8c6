/*!
 * Error types for the readalong application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised by the synchronization engine.
///
/// These abort the whole run: a mismatched timing file means the narration
/// and the selected text disagree, and partial output would silently produce
/// a broken book. The one non-fatal condition (an invalid page-range term)
/// is reported through the log facade instead and never reaches this type.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A timing line did not parse to two numeric values
    #[error("malformed timing line {line}: expected two numeric values, got {content:?}")]
    MalformedTimingLine {
        /// 1-indexed line number in the timing file
        line: usize,
        /// The offending line content
        content: String,
    },

    /// Reading the timing source failed at the I/O level
    #[error("failed to read timing line {line}")]
    TimingRead {
        /// 1-indexed line number that could not be read
        line: usize,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The timing source ran out of entries before every word was aligned
    #[error("timing source exhausted at entry {cursor} while aligning word w{word_id} of '{stem}'")]
    AlignmentExhausted {
        /// Stem of the document being aligned when the source ran dry
        stem: String,
        /// Global word id that could not be aligned
        word_id: usize,
        /// 1-indexed timing cursor value at the point of failure
        cursor: usize,
    },

    /// The content document tree had an unexpected shape
    ///
    /// Should be unreachable with well-formed input; signals that an
    /// upstream collaborator produced a tree the tokenizer cannot splice.
    #[error("document tree invariant violated in '{stem}': {message}")]
    TreeInvariant {
        /// Stem of the offending document
        stem: String,
        /// Description of the violated invariant
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the synchronization engine
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Error reading or writing XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(error: quick_xml::Error) -> Self {
        Self::Xml(error.to_string())
    }
}
