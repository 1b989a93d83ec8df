//! Format-agnostic row pipeline shared by all adapters.
//!
//! Per row: `skip? → postparse → materialize → postmap → check → store → postconvert → accumulate`.

use tracing::{debug, warn};

use crate::error::{EntityError, ImportError, ImportResult, RowStage};
use crate::import::{ImportContext, ProcessedEntity};
use crate::source::RecordSource;
use crate::types::{ImportMode, ImportParams, Record};

use super::callbacks::{map, Callbacks};

/// What to do when a single row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and return [`ImportError::Row`].
    #[default]
    Abort,
    /// Record a [`RowFailure`] and continue with the next row.
    Collect,
}

/// A row that failed under [`FailurePolicy::Collect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub index: usize,
    pub line: u64,
    pub stage: RowStage,
    pub error: EntityError,
}

/// Outcome of a pipeline run.
#[derive(Debug)]
pub struct ProcessReport<E> {
    /// Accumulated entities, in source order.
    pub entities: Vec<E>,
    /// Rows that failed (always empty under [`FailurePolicy::Abort`]).
    pub failures: Vec<RowFailure>,
    /// Number of skip markers seen.
    pub skipped: usize,
}

impl<E> Default for ProcessReport<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            failures: Vec::new(),
            skipped: 0,
        }
    }
}

impl<E> ProcessReport<E> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drive every row of `source` through the pipeline.
///
/// `mode` and `params` are read from the context once, before the first row. The context's run
/// counter is incremented once per accumulated entity; skip markers and failed rows never count.
pub fn run<C, S>(
    ctx: &C,
    source: S,
    callbacks: &Callbacks<C::Entity>,
    dry_run: bool,
    policy: FailurePolicy,
) -> ImportResult<ProcessReport<C::Entity>>
where
    C: ImportContext,
    S: RecordSource,
{
    let options = ImportParams::from_value(ctx.get("params").as_ref())?;
    let mode = ImportMode::from_value(ctx.get("mode").as_ref())?;

    let mut report = ProcessReport::default();
    for row in source {
        let row = row?;
        let Some(record) = row.record else {
            report.skipped += 1;
            continue;
        };

        match process_record(ctx, record, &options, mode, callbacks, dry_run) {
            Ok(entity) => {
                report.entities.push(entity);
                ctx.current_run().processed(1);
            }
            Err((stage, error)) => match policy {
                FailurePolicy::Abort => {
                    return Err(ImportError::Row {
                        index: row.index,
                        line: row.line,
                        stage,
                        source: error,
                    });
                }
                FailurePolicy::Collect => {
                    warn!(index = row.index, line = row.line, %stage, %error, "import row failed");
                    report.failures.push(RowFailure {
                        index: row.index,
                        line: row.line,
                        stage,
                        error,
                    });
                }
            },
        }
    }

    debug!(
        entities = report.entities.len(),
        failures = report.failures.len(),
        skipped = report.skipped,
        dry_run,
        "pipeline run finished"
    );
    Ok(report)
}

fn process_record<C: ImportContext>(
    ctx: &C,
    record: Record,
    options: &ImportParams,
    mode: ImportMode,
    callbacks: &Callbacks<C::Entity>,
    dry_run: bool,
) -> Result<C::Entity, (RowStage, EntityError)> {
    let record = map(record, &callbacks.postparse, dry_run);

    let entity = ctx
        .record(record, options, mode)
        .map_err(|e| (RowStage::Materialize, e))?;
    let mut entity = map(entity, &callbacks.postmap, dry_run);

    entity.check().map_err(|e| (RowStage::Validate, e))?;
    entity.store(dry_run).map_err(|e| (RowStage::Store, e))?;

    Ok(map(entity, &callbacks.postconvert, dry_run))
}
