#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use content_import::error::EntityError;
use content_import::import::{ImportContext, ImportRun, ProcessedEntity};
use content_import::types::{ImportMode, ImportParams, Record};

/// Rows committed by [`Entry::store`] outside of dry runs.
pub type Persisted = Arc<Mutex<Vec<Record>>>;

#[derive(Debug, Clone)]
pub struct Entry {
    pub record: Record,
    pub mode: ImportMode,
    pub params: ImportParams,
    pub notes: Vec<String>,
    pub stored: bool,
    persisted: Persisted,
}

impl ProcessedEntity for Entry {
    fn check(&self) -> Result<(), EntityError> {
        match self.record.get("name") {
            None | Some("") => Err(EntityError::Invalid("name is required".into())),
            Some("INVALID") => Err(EntityError::Invalid("name rejected".into())),
            Some(_) => Ok(()),
        }
    }

    fn store(&mut self, dry_run: bool) -> Result<(), EntityError> {
        if !dry_run {
            self.persisted.lock().unwrap().push(self.record.clone());
        }
        self.stored = true;
        Ok(())
    }
}

pub struct TestImport {
    pub path: PathBuf,
    pub config: Map<String, Value>,
    pub run: ImportRun,
    pub persisted: Persisted,
    /// Names whose conversion fails.
    pub unconvertible: Vec<String>,
}

impl TestImport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: Map::new(),
            run: ImportRun::new(),
            persisted: Arc::new(Mutex::new(Vec::new())),
            unconvertible: Vec::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }

    pub fn persisted_len(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }
}

impl ImportContext for TestImport {
    type Entity = Entry;

    fn datapath(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.config.get(key).cloned()
    }

    fn record(
        &self,
        raw: Record,
        options: &ImportParams,
        mode: ImportMode,
    ) -> Result<Entry, EntityError> {
        if let Some(name) = raw.get("name") {
            if self.unconvertible.iter().any(|n| n == name) {
                return Err(EntityError::Conversion(format!("cannot convert '{name}'")));
            }
        }
        Ok(Entry {
            record: raw,
            mode,
            params: options.clone(),
            notes: Vec::new(),
            stored: false,
            persisted: Arc::clone(&self.persisted),
        })
    }

    fn current_run(&self) -> &ImportRun {
        &self.run
    }
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn tmp_file(ext: &str) -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let seq = SEQ.fetch_add(1, Ordering::SeqCst);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("content-import-{nanos}-{seq}.{ext}"))
}

pub fn names(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.record.get("name").unwrap_or_default().to_string())
        .collect()
}
