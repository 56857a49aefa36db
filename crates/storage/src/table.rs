//! In-memory view of one text table
//!
//! A [`Table`] is loaded once per operation, edited by position, and
//! persisted once. Each [`Entry`] keeps the raw line it was read from:
//!
//! - untouched entries are written back byte-for-byte
//! - malformed entries are reported as [`Notice`]s and written back as-is,
//!   including lines that are not valid UTF-8
//! - replaced entries are re-encoded with [`Record::to_line`]

use std::path::{Path, PathBuf};

use medtrack_core::{Notice, Result};
use tracing::{info, warn};

use crate::lines::{append_line, load_raw_lines, save_lines};

/// A row type that can be read from and written to one line.
pub trait Record: Sized {
    /// Decode one line.
    fn parse_line(line: &str) -> Result<Self>;

    /// Encode as one line, without terminator.
    fn to_line(&self) -> String;
}

#[derive(Debug, Clone)]
enum State<R> {
    Parsed(R),
    Malformed(String),
}

/// One line of a table.
#[derive(Debug, Clone)]
pub struct Entry<R> {
    line_number: usize,
    line: String,
    // Original bytes of a line that did not decode as UTF-8.
    undecoded: Option<Vec<u8>>,
    state: State<R>,
}

impl<R: Record> Entry<R> {
    fn read(line_number: usize, line: String) -> Self {
        let state = match R::parse_line(&line) {
            Ok(record) => State::Parsed(record),
            Err(e) => State::Malformed(e.to_string()),
        };
        Entry {
            line_number,
            line,
            undecoded: None,
            state,
        }
    }

    fn decode(line_number: usize, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(line) => Self::read(line_number, line),
            Err(e) => Entry {
                line_number,
                line: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                state: State::Malformed(format!("line is not valid UTF-8: {}", e.utf8_error())),
                undecoded: Some(e.into_bytes()),
            },
        }
    }

    /// 1-based position in the file.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The line as text. Undecodable bytes show as U+FFFD.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The line exactly as it will be written.
    pub fn bytes(&self) -> &[u8] {
        self.undecoded.as_deref().unwrap_or(self.line.as_bytes())
    }

    /// Parsed record, or `None` for a malformed line.
    pub fn record(&self) -> Option<&R> {
        match &self.state {
            State::Parsed(record) => Some(record),
            State::Malformed(_) => None,
        }
    }

    /// Check whether the line failed to parse.
    pub fn is_malformed(&self) -> bool {
        matches!(self.state, State::Malformed(_))
    }

    /// Notice describing a malformed line.
    pub fn notice(&self) -> Option<Notice> {
        match &self.state {
            State::Parsed(_) => None,
            State::Malformed(reason) => Some(Notice {
                line_number: self.line_number,
                line: self.line.clone(),
                reason: reason.clone(),
            }),
        }
    }

    /// Swap in a new record; the line is re-encoded.
    pub fn replace(&mut self, record: R) {
        self.line = record.to_line();
        self.undecoded = None;
        self.state = State::Parsed(record);
    }
}

/// An ordered table of entries backed by one file.
#[derive(Debug, Clone)]
pub struct Table<R> {
    path: PathBuf,
    entries: Vec<Entry<R>>,
}

impl<R: Record> Table<R> {
    /// Load and parse every line of `path`.
    ///
    /// Malformed lines are kept and logged; see [`Table::notices`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<Entry<R>> = load_raw_lines(&path)?
            .into_iter()
            .enumerate()
            .map(|(idx, bytes)| Entry::decode(idx + 1, bytes))
            .collect();

        for entry in &entries {
            if let Some(notice) = entry.notice() {
                warn!("{}: {}", path.display(), notice);
            }
        }

        Ok(Table { path, entries })
    }

    /// Append one record to the file behind `path` without loading it.
    pub fn append(path: impl AsRef<Path>, record: &R) -> Result<()> {
        let path = path.as_ref();
        append_line(path, &record.to_line())?;
        info!("Appended record to {}", path.display());
        Ok(())
    }

    /// Write every entry back, in order.
    pub fn persist(&self) -> Result<()> {
        let lines: Vec<&[u8]> = self.entries.iter().map(Entry::bytes).collect();
        save_lines(&self.path, &lines)?;
        info!(
            "Rewrote {} ({} entries)",
            self.path.display(),
            self.entries.len()
        );
        Ok(())
    }

    /// File backing this table.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines, malformed included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no lines.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[Entry<R>] {
        &self.entries
    }

    /// Mutable entries in file order.
    pub fn entries_mut(&mut self) -> &mut [Entry<R>] {
        &mut self.entries
    }

    /// Parsed records in file order; malformed lines are skipped.
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().filter_map(Entry::record)
    }

    /// Notices for every malformed line.
    pub fn notices(&self) -> Vec<Notice> {
        self.entries.iter().filter_map(Entry::notice).collect()
    }
}
