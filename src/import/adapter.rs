use crate::error::ImportResult;
use crate::processing::{Callbacks, ProcessReport};

use super::context::ImportContext;

/// A format-specific implementation of the import contract.
///
/// Every operation opens its own traversal of the context's data file, so operations may be
/// called repeatedly and in any order with consistent results for an unmodified file.
pub trait ImportAdapter<C: ImportContext> {
    /// Short adapter name used in logs and observer events.
    fn name(&self) -> &'static str;

    /// Mime types this adapter can read.
    fn mime_types(&self) -> &'static [&'static str];

    /// Number of data rows, skip markers excluded.
    fn count(&self, ctx: &C) -> ImportResult<usize>;

    /// Field names of the data file, without reading data rows.
    fn headers(&self, ctx: &C) -> ImportResult<Vec<String>>;

    /// Run every row through the pipeline; the first failing row aborts the run.
    fn process(
        &self,
        ctx: &C,
        callbacks: &Callbacks<C::Entity>,
        dry_run: bool,
    ) -> ImportResult<Vec<C::Entity>>;

    /// Like [`Self::process`], but failing rows are collected and processing continues.
    fn process_report(
        &self,
        ctx: &C,
        callbacks: &Callbacks<C::Entity>,
        dry_run: bool,
    ) -> ImportResult<ProcessReport<C::Entity>>;
}
