use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::EntityError;
use crate::types::{ImportMode, ImportParams, Record};

/// An entity produced from a [`Record`] by [`ImportContext::record`].
pub trait ProcessedEntity {
    /// Validate the entity.
    fn check(&self) -> Result<(), EntityError>;

    /// Persist the entity. When `dry_run` is `true` nothing may be committed.
    fn store(&mut self, dry_run: bool) -> Result<(), EntityError>;
}

/// The import an adapter runs against.
///
/// Implemented by the host application; adapters only consume it.
pub trait ImportContext {
    type Entity: ProcessedEntity;

    /// Location of the data file.
    fn datapath(&self) -> &Path;

    /// Configuration value for `key` (adapters read `mode` and `params`).
    fn get(&self, key: &str) -> Option<Value>;

    /// Convert a raw record into an entity.
    ///
    /// `mode` is parsed from `get("mode")` once per run, before any row. Only `UPDATE` and
    /// `PATCH` (case-insensitive) reach this method; any other value fails the whole run with
    /// [`crate::ImportError::Config`].
    fn record(
        &self,
        raw: Record,
        options: &ImportParams,
        mode: ImportMode,
    ) -> Result<Self::Entity, EntityError>;

    /// Counters for the run currently in progress.
    fn current_run(&self) -> &ImportRun;
}

/// Run-scoped counters for one import run.
///
/// Counters are atomic so contexts can hand out `&ImportRun` from `&self`.
#[derive(Default)]
pub struct ImportRun {
    processed: AtomicU64,
}

impl ImportRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `n` more records as processed.
    pub fn processed(&self, n: u64) {
        let _ = self.processed.fetch_add(n, Ordering::SeqCst);
    }

    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    /// Reset counters before reusing the run.
    pub fn reset(&self) {
        self.processed.store(0, Ordering::SeqCst);
    }
}

impl fmt::Debug for ImportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportRun")
            .field("processed", &self.processed_count())
            .finish()
    }
}

impl fmt::Display for ImportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processed={}", self.processed_count())
    }
}
