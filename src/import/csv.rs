//! CSV import adapter.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::error::ImportResult;
use crate::processing::{self, Callbacks, FailurePolicy, ProcessReport};
use crate::source::{tally_records, CsvOptions, CsvSource, RecordSource};

use super::adapter::ImportAdapter;
use super::context::ImportContext;
use super::observability::{
    severity_for_error, ImportObserver, ImportOperation, ImportSeverity, ImportStats, OperationContext,
};

/// Imports delimiter-separated text files.
///
/// The adapter keeps no traversal state: `count`, `headers` and `process` each open a fresh
/// [`CsvSource`] over [`ImportContext::datapath`].
#[derive(Clone)]
pub struct CsvAdapter {
    options: CsvOptions,
    observer: Option<Arc<dyn ImportObserver>>,
    alert_at_or_above: ImportSeverity,
}

impl CsvAdapter {
    pub const NAME: &'static str = "csv";

    /// Mime types the CSV adapter responds to.
    pub const MIME_TYPES: &'static [&'static str] =
        &["csv", "text/plain", "text/csv", "application/vnd.ms-excel"];

    /// Does this adapter respond to `mime`? Exact match against [`Self::MIME_TYPES`].
    pub fn accepts(mime: &str) -> bool {
        Self::MIME_TYPES.contains(&mime)
    }

    pub fn new(options: CsvOptions) -> Self {
        Self {
            options,
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }

    /// Attach an observer for operation outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn ImportObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Severity at which `on_alert` is invoked (default [`ImportSeverity::Critical`]).
    pub fn with_alert_threshold(mut self, severity: ImportSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    fn open<C: ImportContext>(&self, ctx: &C) -> ImportResult<CsvSource> {
        CsvSource::open(ctx.datapath(), &self.options)
    }

    fn run<C: ImportContext>(
        &self,
        ctx: &C,
        callbacks: &Callbacks<C::Entity>,
        dry_run: bool,
        policy: FailurePolicy,
    ) -> ImportResult<ProcessReport<C::Entity>> {
        let result = self
            .open(ctx)
            .and_then(|source| processing::run(ctx, source, callbacks, dry_run, policy));

        self.observe(ctx, ImportOperation::Process { dry_run }, result, |report| ImportStats {
            rows: report.entities.len(),
            skipped: report.skipped,
            failed: report.failures.len(),
        })
    }

    fn observe<C, T, F>(
        &self,
        ctx: &C,
        operation: ImportOperation,
        result: ImportResult<T>,
        stats: F,
    ) -> ImportResult<T>
    where
        C: ImportContext,
        F: FnOnce(&T) -> ImportStats,
    {
        let Some(obs) = self.observer.as_ref() else {
            return result;
        };

        let op_ctx = OperationContext {
            path: ctx.datapath().to_path_buf(),
            adapter: Self::NAME,
            operation,
        };
        match &result {
            Ok(v) => obs.on_success(&op_ctx, stats(v)),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&op_ctx, sev, e);
                if sev >= self.alert_at_or_above {
                    obs.on_alert(&op_ctx, sev, e);
                }
            }
        }
        result
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new(CsvOptions::default())
    }
}

impl fmt::Debug for CsvAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvAdapter")
            .field("options", &self.options)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl<C: ImportContext> ImportAdapter<C> for CsvAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn mime_types(&self) -> &'static [&'static str] {
        Self::MIME_TYPES
    }

    fn count(&self, ctx: &C) -> ImportResult<usize> {
        let result = self.open(ctx).and_then(tally_records);
        let result = self.observe(ctx, ImportOperation::Count, result, |t| ImportStats {
            rows: t.rows,
            skipped: t.skipped,
            failed: 0,
        });
        result.map(|t| t.rows)
    }

    fn headers(&self, ctx: &C) -> ImportResult<Vec<String>> {
        let result = self.open(ctx).map(|source| source.headers().to_vec());
        self.observe(ctx, ImportOperation::Headers, result, |h| ImportStats {
            rows: h.len(),
            ..ImportStats::default()
        })
    }

    fn process(
        &self,
        ctx: &C,
        callbacks: &Callbacks<C::Entity>,
        dry_run: bool,
    ) -> ImportResult<Vec<C::Entity>> {
        let report = self.run(ctx, callbacks, dry_run, FailurePolicy::Abort)?;
        info!(
            path = %ctx.datapath().display(),
            processed = report.entities.len(),
            skipped = report.skipped,
            dry_run,
            "csv import processed"
        );
        Ok(report.entities)
    }

    fn process_report(
        &self,
        ctx: &C,
        callbacks: &Callbacks<C::Entity>,
        dry_run: bool,
    ) -> ImportResult<ProcessReport<C::Entity>> {
        let report = self.run(ctx, callbacks, dry_run, FailurePolicy::Collect)?;
        info!(
            path = %ctx.datapath().display(),
            processed = report.entities.len(),
            failed = report.failures.len(),
            skipped = report.skipped,
            dry_run,
            "csv import processed with per-row failures collected"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::CsvAdapter;

    #[test]
    fn accepts_declared_mime_types_only() {
        for mime in ["csv", "text/plain", "text/csv", "application/vnd.ms-excel"] {
            assert!(CsvAdapter::accepts(mime), "{mime}");
        }
        assert!(!CsvAdapter::accepts("application/json"));
        assert!(!CsvAdapter::accepts("TEXT/CSV"));
        assert!(!CsvAdapter::accepts(""));
    }
}
