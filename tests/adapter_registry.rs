mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use content_import::import::{AdapterRegistry, CsvAdapter, ImportAdapter};
use content_import::processing::Callbacks;
use content_import::source::CsvOptions;

use common::{fixture, names, TestImport};

#[test]
fn defaults_cover_the_csv_mime_types() {
    let reg = AdapterRegistry::<TestImport>::with_defaults();

    for mime in CsvAdapter::MIME_TYPES {
        assert!(reg.accepts(mime), "{mime}");
    }
    assert!(reg.accepts("Text/CSV; charset=utf-8"));
    assert!(!reg.accepts("application/json"));
    assert!(reg.adapter_for("application/json").is_none());
    assert_eq!(
        reg.mime_types(),
        vec!["application/vnd.ms-excel", "csv", "text/csv", "text/plain"]
    );
}

#[test]
fn selected_adapter_runs_the_import() {
    let reg = AdapterRegistry::<TestImport>::default();
    let ctx = TestImport::new(fixture("people.csv"));

    let adapter = reg.adapter_for_path(&ctx.path).unwrap();
    assert_eq!(adapter.name(), "csv");
    assert_eq!(adapter.count(&ctx).unwrap(), 2);

    let out = adapter.process(&ctx, &Callbacks::new(), true).unwrap();
    assert_eq!(names(&out), vec!["Alice", "Bob"]);
}

#[test]
fn first_registration_wins_on_overlap() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut reg = AdapterRegistry::<TestImport>::new();

    let tsv_built = Arc::clone(&built);
    let claimed = reg.register(&["text/tab-separated-values", "text/plain"], move || {
        tsv_built.fetch_add(1, Ordering::SeqCst);
        Box::new(CsvAdapter::new(CsvOptions::default().with_delimiter(b'\t'))) as Box<dyn ImportAdapter<TestImport>>
    });
    assert_eq!(claimed, 2);

    // text/plain is already claimed; only the remaining three are new.
    let claimed = reg.register(CsvAdapter::MIME_TYPES, || {
        Box::new(CsvAdapter::default()) as Box<dyn ImportAdapter<TestImport>>
    });
    assert_eq!(claimed, 3);

    let _ = reg.adapter_for("text/plain").unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);

    let _ = reg.adapter_for("text/csv").unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_extension_has_no_adapter() {
    let reg = AdapterRegistry::<TestImport>::with_defaults();
    assert!(reg.adapter_for_path("data.parquet").is_none());
    assert!(reg.adapter_for_path("README").is_none());
}
