//! Mime type → adapter registry.
//!
//! Adapters are registered once at startup; lookups pick the adapter that first claimed a
//! mime type, so overlapping claims are resolved by registration order.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::adapter::ImportAdapter;
use super::context::ImportContext;
use super::csv::CsvAdapter;

/// Builds a fresh adapter for one import run.
pub type AdapterFactory<C> = Arc<dyn Fn() -> Box<dyn ImportAdapter<C>> + Send + Sync>;

/// Maps mime types to adapter constructors.
pub struct AdapterRegistry<C: ImportContext> {
    by_mime: HashMap<String, AdapterFactory<C>>,
}

impl<C: ImportContext + 'static> AdapterRegistry<C> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            by_mime: HashMap::new(),
        }
    }

    /// Registry with the built-in adapters (currently CSV).
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(CsvAdapter::MIME_TYPES, || {
            Box::new(CsvAdapter::default()) as Box<dyn ImportAdapter<C>>
        });
        reg
    }

    /// Register `factory` for `mime_types`.
    ///
    /// Mime types already claimed by an earlier registration are left untouched. Returns the
    /// number of mime types newly claimed.
    pub fn register<F>(&mut self, mime_types: &[&str], factory: F) -> usize
    where
        F: Fn() -> Box<dyn ImportAdapter<C>> + Send + Sync + 'static,
    {
        let factory: AdapterFactory<C> = Arc::new(factory);
        let mut claimed = 0;
        for mime in mime_types {
            let key = normalize_mime(mime);
            if self.by_mime.contains_key(&key) {
                debug!(mime = %key, "mime type already registered; keeping first adapter");
                continue;
            }
            self.by_mime.insert(key, Arc::clone(&factory));
            claimed += 1;
        }
        claimed
    }

    /// Is any adapter registered for `mime`?
    pub fn accepts(&self, mime: &str) -> bool {
        self.by_mime.contains_key(&normalize_mime(mime))
    }

    /// Build the adapter registered for `mime`.
    pub fn adapter_for(&self, mime: &str) -> Option<Box<dyn ImportAdapter<C>>> {
        self.by_mime.get(&normalize_mime(mime)).map(|f| f())
    }

    /// Build the adapter for a data file, inferring its mime type from the extension.
    pub fn adapter_for_path(&self, path: impl AsRef<Path>) -> Option<Box<dyn ImportAdapter<C>>> {
        let mime = mime_from_path(path.as_ref())?;
        self.adapter_for(mime)
    }

    /// Registered mime types, sorted.
    pub fn mime_types(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.by_mime.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

impl<C: ImportContext + 'static> Default for AdapterRegistry<C> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<C: ImportContext> fmt::Debug for AdapterRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("mime_types", &self.by_mime.len())
            .finish()
    }
}

/// Lowercase and strip parameters (`text/csv; charset=utf-8` → `text/csv`).
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Mime type for a data file, by extension (case-insensitive).
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    match ext.to_ascii_lowercase().as_str() {
        "csv" => Some("text/csv"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
