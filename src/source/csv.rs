//! CSV record source.

use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ImportError, ImportResult};
use crate::types::Record;

use super::{RecordSource, SourceRow};

/// Options controlling how a CSV file is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// If `false`, fields are named by position (`"0"`, `"1"`, ...) and the first row is data.
    pub has_headers: bool,
    /// Trim surrounding whitespace from values. Header names are always trimmed.
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            trim: false,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut b = csv::ReaderBuilder::new();
        b.delimiter(self.delimiter)
            .has_headers(self.has_headers)
            // Row width is checked against the headers here, so short/long rows become skip markers.
            .flexible(true)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::Headers });
        b
    }
}

/// Streaming CSV reader yielding [`SourceRow`]s.
///
/// Rules:
///
/// - Empty lines and rows whose fields are all empty are skip markers.
/// - Rows with a field count different from the header count are skip markers.
/// - Rows that are not valid UTF-8 are skip markers.
/// - I/O errors end the traversal with an error.
/// - Repeated header names get a `_2`, `_3`, ... suffix.
///
/// The underlying file is closed when the source is dropped.
pub struct CsvSource<R = File> {
    reader: csv::Reader<LineTracker<R>>,
    headers: Vec<String>,
    buf: csv::StringRecord,
    next_index: usize,
    done: bool,
}

impl CsvSource<File> {
    /// Open `path` and read its header row.
    pub fn open(path: impl AsRef<Path>, options: &CsvOptions) -> ImportResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, options)
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any reader; the header row (if configured) is read immediately.
    pub fn from_reader(rdr: R, options: &CsvOptions) -> ImportResult<Self> {
        let mut reader = options.reader_builder().from_reader(LineTracker::new(rdr));

        // Without a header row `headers()` peeks at the first record without consuming it.
        let first = reader.headers()?.clone();
        let headers = if options.has_headers {
            dedupe_headers(first.iter())
        } else {
            (0..first.len()).map(|i| i.to_string()).collect()
        };

        Ok(Self {
            reader,
            headers,
            buf: csv::StringRecord::new(),
            next_index: 0,
            done: false,
        })
    }

    /// Line of the last byte consumed by the reader, i.e. the last line of the row just read.
    fn current_line(&mut self) -> u64 {
        let end = self.reader.position().byte();
        self.reader.get_mut().line_of(end.saturating_sub(1))
    }

    fn to_row(&self, index: usize, line: u64) -> SourceRow {
        let record = if self.buf.iter().all(|v| v.trim().is_empty()) {
            debug!(index, line, "skipping blank csv row");
            None
        } else if self.buf.len() != self.headers.len() {
            warn!(
                index,
                line,
                expected = self.headers.len(),
                found = self.buf.len(),
                "skipping csv row with unexpected field count"
            );
            None
        } else {
            Some(Record::from_pairs(
                self.headers.iter().cloned().zip(self.buf.iter().map(str::to_owned)),
            ))
        };

        SourceRow {
            index,
            line,
            record,
        }
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = ImportResult<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let index = self.next_index;
        match self.reader.read_record(&mut self.buf) {
            Ok(true) => {
                self.next_index += 1;
                let embedded = self.buf.iter().map(|v| v.matches('\n').count() as u64).sum::<u64>();
                let line = self.current_line().saturating_sub(embedded);
                Some(Ok(self.to_row(index, line)))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) if matches!(err.kind(), csv::ErrorKind::Utf8 { .. }) => {
                self.next_index += 1;
                let line = self.current_line();
                warn!(index, line, "skipping csv row with invalid utf-8");
                Some(Ok(SourceRow {
                    index,
                    line,
                    record: None,
                }))
            }
            Err(err) => {
                self.done = true;
                Some(Err(ImportError::Csv(err)))
            }
        }
    }
}

impl<R: Read> RecordSource for CsvSource<R> {
    fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// Header names with repeats suffixed (`id`, `id_2`, ...) so no column is lost.
fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let mut candidate = name.to_owned();
        let mut n = 1;
        while !seen.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{name}_{n}");
        }
        if n > 1 {
            warn!(header = name, renamed = %candidate, "duplicate csv header renamed");
        }
        out.push(candidate);
    }
    out
}

/// Reader wrapper remembering where newlines fall, so rows map back to physical file lines.
/// `csv::Position::line` skips blank lines.
struct LineTracker<R> {
    inner: R,
    offset: u64,
    /// Offsets of newlines not yet passed by [`LineTracker::line_of`].
    pending: VecDeque<u64>,
    passed: u64,
}

impl<R> LineTracker<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            pending: VecDeque::new(),
            passed: 0,
        }
    }

    /// 1-based line holding byte `at`. Offsets must be queried in non-decreasing order.
    fn line_of(&mut self, at: u64) -> u64 {
        while self.pending.front().is_some_and(|&nl| nl < at) {
            self.pending.pop_front();
            self.passed += 1;
        }
        self.passed + 1
    }
}

impl<R: Read> Read for LineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let base = self.offset;
        self.pending.extend(
            buf[..n]
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| base + i as u64),
        );
        self.offset += n as u64;
        Ok(n)
    }
}
