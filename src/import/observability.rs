use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::ImportError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Adapter operation being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOperation {
    Count,
    Headers,
    Process { dry_run: bool },
}

/// Context about one adapter operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// The data file the operation ran against.
    pub path: PathBuf,
    /// Adapter name (e.g. `"csv"`).
    pub adapter: &'static str,
    pub operation: ImportOperation,
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows counted or processed (header count for [`ImportOperation::Headers`]).
    pub rows: usize,
    /// Skip markers seen.
    pub skipped: usize,
    /// Rows that failed but did not abort the run.
    pub failed: usize,
}

/// Observer interface for adapter outcomes.
pub trait ImportObserver: Send + Sync {
    /// Called when an operation succeeds.
    fn on_success(&self, _ctx: &OperationContext, _stats: ImportStats) {}

    /// Called when an operation fails.
    fn on_failure(&self, _ctx: &OperationContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &OperationContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_success(&self, ctx: &OperationContext, stats: ImportStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &OperationContext, severity: ImportSeverity, error: &ImportError) {
        self.observers
            .iter()
            .for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &OperationContext, severity: ImportSeverity, error: &ImportError) {
        self.observers
            .iter()
            .for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Emits adapter outcomes as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_success(&self, ctx: &OperationContext, stats: ImportStats) {
        info!(
            adapter = ctx.adapter,
            operation = ?ctx.operation,
            path = %ctx.path.display(),
            rows = stats.rows,
            skipped = stats.skipped,
            failed = stats.failed,
            "import operation finished"
        );
    }

    fn on_failure(&self, ctx: &OperationContext, severity: ImportSeverity, err: &ImportError) {
        warn!(
            adapter = ctx.adapter,
            operation = ?ctx.operation,
            path = %ctx.path.display(),
            ?severity,
            error = %err,
            "import operation failed"
        );
    }

    fn on_alert(&self, ctx: &OperationContext, severity: ImportSeverity, err: &ImportError) {
        error!(
            adapter = ctx.adapter,
            operation = ?ctx.operation,
            path = %ctx.path.display(),
            ?severity,
            error = %err,
            "import alert"
        );
    }
}

/// Severity for a failed operation: infrastructure failures are critical.
pub fn severity_for_error(e: &ImportError) -> ImportSeverity {
    match e {
        ImportError::Io(_) => ImportSeverity::Critical,
        ImportError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        ImportError::Storage { .. } => ImportSeverity::Critical,
        ImportError::Config { .. } | ImportError::Row { .. } => ImportSeverity::Error,
    }
}
