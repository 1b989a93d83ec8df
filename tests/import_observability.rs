mod common;

use std::sync::{Arc, Mutex};

use content_import::import::{
    CompositeObserver, CsvAdapter, ImportAdapter, ImportObserver, ImportOperation, ImportSeverity, ImportStats,
    OperationContext, TracingObserver,
};
use content_import::processing::Callbacks;
use content_import::ImportError;

use common::{fixture, TestImport};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(ImportOperation, ImportStats)>>,
    failures: Mutex<Vec<ImportSeverity>>,
    alerts: Mutex<Vec<ImportSeverity>>,
}

impl ImportObserver for RecordingObserver {
    fn on_success(&self, ctx: &OperationContext, stats: ImportStats) {
        assert_eq!(ctx.adapter, "csv");
        self.successes.lock().unwrap().push((ctx.operation, stats));
    }

    fn on_failure(&self, _ctx: &OperationContext, severity: ImportSeverity, _error: &ImportError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &OperationContext, severity: ImportSeverity, _error: &ImportError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_stats_for_each_operation() {
    let obs = Arc::new(RecordingObserver::default());
    let adapter = CsvAdapter::default().with_observer(obs.clone());
    let ctx = TestImport::new(fixture("people_messy.csv"));

    adapter.headers(&ctx).unwrap();
    adapter.count(&ctx).unwrap();
    adapter.process(&ctx, &Callbacks::new(), true).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![
            (
                ImportOperation::Headers,
                ImportStats {
                    rows: 3,
                    skipped: 0,
                    failed: 0
                }
            ),
            (
                ImportOperation::Count,
                ImportStats {
                    rows: 2,
                    skipped: 3,
                    failed: 0
                }
            ),
            (
                ImportOperation::Process { dry_run: true },
                ImportStats {
                    rows: 2,
                    skipped: 3,
                    failed: 0
                }
            ),
        ]
    );
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let adapter = CsvAdapter::default()
        .with_observer(obs.clone())
        .with_alert_threshold(ImportSeverity::Critical);
    let ctx = TestImport::new(fixture("does_not_exist.csv"));

    let _ = adapter.count(&ctx).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ImportSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![ImportSeverity::Critical]);
}

#[test]
fn row_failure_is_reported_without_alert_at_critical_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let adapter = CsvAdapter::default().with_observer(obs.clone());
    let ctx = TestImport::new(fixture("people_invalid.csv"));

    let err = adapter.process(&ctx, &Callbacks::new(), false).unwrap_err();
    assert!(err.is_row_failure());

    assert_eq!(*obs.failures.lock().unwrap(), vec![ImportSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn process_report_counts_failed_rows_in_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let adapter = CsvAdapter::default().with_observer(obs.clone());
    let ctx = TestImport::new(fixture("people_invalid.csv"));

    let report = adapter.process_report(&ctx, &Callbacks::new(), true).unwrap();
    assert_eq!(report.failures.len(), 1);

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].1.rows, 2);
    assert_eq!(successes[0].1.failed, 1);
}

#[test]
fn composite_observer_fans_out() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn ImportObserver>> = vec![a.clone(), b.clone(), Arc::new(TracingObserver)];
    let composite = CompositeObserver::new(observers);
    let adapter = CsvAdapter::default()
        .with_observer(Arc::new(composite))
        .with_alert_threshold(ImportSeverity::Error);
    let ctx = TestImport::new(fixture("people_invalid.csv"));

    adapter.count(&ctx).unwrap();
    let _ = adapter.process(&ctx, &Callbacks::new(), false).unwrap_err();

    for obs in [&a, &b] {
        assert_eq!(obs.successes.lock().unwrap().len(), 1);
        assert_eq!(*obs.alerts.lock().unwrap(), vec![ImportSeverity::Error]);
    }
}
