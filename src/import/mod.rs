//! Import adapters and the contract they run against.
//!
//! Most callers pick an adapter from an [`AdapterRegistry`] and then call, through
//! [`ImportAdapter`]:
//!
//! - `count` to size the import
//! - `headers` to offer field mappings
//! - `process` to run every row through the callback pipeline (optionally as a dry run)
//!
//! The host application supplies the [`ImportContext`] (data path, `mode`/`params`, record
//! materialization, run counter) and the [`ProcessedEntity`] type. Outcomes can be reported to an
//! [`ImportObserver`].
//!
//! Format-specific adapters:
//! - [`csv`]

pub mod adapter;
pub mod context;
pub mod csv;
pub mod observability;
pub mod registry;

pub use adapter::ImportAdapter;
pub use context::{ImportContext, ImportRun, ProcessedEntity};
pub use self::csv::CsvAdapter;
pub use observability::{
    severity_for_error, CompositeObserver, ImportObserver, ImportOperation, ImportSeverity, ImportStats,
    OperationContext, TracingObserver,
};
pub use registry::{mime_from_path, normalize_mime, AdapterFactory, AdapterRegistry};
