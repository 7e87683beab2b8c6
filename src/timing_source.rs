use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::SyncError;

// @module: Sequential audio timing source

/// One audio clip range in seconds.
///
/// The values are kept verbatim as they appeared in the timing file so the
/// emitted overlay reproduces the narrator tool's output exactly (`1.50`
/// stays `1.50`, not `1.5`); they are validated as numeric on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingEntry {
    // @field: Clip start in seconds, verbatim
    pub clip_begin: String,

    // @field: Clip end in seconds, verbatim
    pub clip_end: String,
}

/// A forward-only reader over a timing file.
///
/// Each line carries two whitespace-separated numeric values (start and end,
/// in seconds); lines are consumed strictly in file order, one per word,
/// through a single shared cursor. The cursor is never reset between
/// documents - positional consumption across the whole selected set is what
/// ties word ids to clip ranges. Lines beyond the last consumed entry are
/// never touched, so trailing blank or unused lines are legitimate.
pub struct TimingSource<R: BufRead> {
    lines: Lines<R>,
    cursor: usize,
}

impl TimingSource<BufReader<File>> {
    /// Open a timing file for sequential consumption
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open timing file: {:?}", path.as_ref()))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> TimingSource<R> {
    /// Wrap any buffered reader as a timing source
    pub fn from_reader(reader: R) -> Self {
        TimingSource {
            lines: reader.lines(),
            cursor: 1,
        }
    }

    /// 1-indexed position of the next entry to be consumed
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pop the next timing entry.
    ///
    /// Returns Ok(None) once the source is exhausted; the caller decides
    /// whether that is an error (it is, whenever words remain unaligned).
    pub fn next_entry(&mut self) -> Result<Option<TimingEntry>, SyncError> {
        let line = match self.lines.next() {
            None => return Ok(None),
            Some(Err(source)) => {
                return Err(SyncError::TimingRead { line: self.cursor, source });
            }
            Some(Ok(line)) => line,
        };

        let entry = Self::parse_line(&line).ok_or_else(|| SyncError::MalformedTimingLine {
            line: self.cursor,
            content: line.clone(),
        })?;

        self.cursor += 1;
        Ok(Some(entry))
    }

    /// Parse one line into an entry, or None if it is not two numbers.
    ///
    /// Columns past the second are tolerated and ignored.
    fn parse_line(line: &str) -> Option<TimingEntry> {
        let mut values = line.split_whitespace();
        let begin = values.next()?;
        let end = values.next()?;

        begin.parse::<f64>().ok()?;
        end.parse::<f64>().ok()?;

        Some(TimingEntry {
            clip_begin: begin.to_string(),
            clip_end: end.to_string(),
        })
    }
}
