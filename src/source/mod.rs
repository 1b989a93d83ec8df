//! Record sources: lazy, finite row producers over a data file.
//!
//! A source yields one [`SourceRow`] per physical row. Rows that carry no usable data (blank or
//! malformed lines) are yielded as skip markers (`record == None`) so callers can filter them
//! before counting or processing. Sources are restartable by opening a new one over the same path.
//!
//! - [`csv`]: delimiter-separated text files

pub mod csv;

use crate::error::ImportResult;
use crate::types::Record;

pub use self::csv::{CsvOptions, CsvSource};

/// One row produced by a [`RecordSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 0-based data row index, skip markers included.
    pub index: usize,
    /// 1-based physical line in the underlying file where the row starts.
    pub line: u64,
    /// The parsed record, or `None` for a skip marker.
    pub record: Option<Record>,
}

impl SourceRow {
    pub fn is_skip(&self) -> bool {
        self.record.is_none()
    }
}

/// A sequence of raw rows plus the header list describing them.
pub trait RecordSource: Iterator<Item = ImportResult<SourceRow>> {
    /// Field names, in source order.
    fn headers(&self) -> &[String];
}

/// Row totals from a full traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowTally {
    /// Non-skip rows.
    pub rows: usize,
    /// Skip markers.
    pub skipped: usize,
}

/// Drain `source`, counting data rows and skip markers.
pub fn tally_records<S: RecordSource>(source: S) -> ImportResult<RowTally> {
    let mut tally = RowTally::default();
    for row in source {
        if row?.is_skip() {
            tally.skipped += 1;
        } else {
            tally.rows += 1;
        }
    }
    Ok(tally)
}
