//! `content-import` runs content imports through a small, format-agnostic pipeline.
//!
//! An adapter (CSV ships with the crate) reads a data file row by row and feeds every
//! [`types::Record`] through three hook points, with the host application's
//! [`import::ImportContext`] converting records into entities in between:
//!
//! ```text
//! source row ─▶ postparse ─▶ ctx.record() ─▶ postmap ─▶ check + store(dry_run) ─▶ postconvert ─▶ result
//! ```
//!
//! Blank and malformed rows are skip markers: they are never counted, processed or surfaced.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! use content_import::error::EntityError;
//! use content_import::import::{CsvAdapter, ImportAdapter, ImportContext, ImportRun, ProcessedEntity};
//! use content_import::processing::Callbacks;
//! use content_import::types::{ImportMode, ImportParams, Record};
//!
//! struct Page {
//!     title: String,
//! }
//!
//! impl ProcessedEntity for Page {
//!     fn check(&self) -> Result<(), EntityError> {
//!         if self.title.is_empty() {
//!             return Err(EntityError::Invalid("title is required".into()));
//!         }
//!         Ok(())
//!     }
//!
//!     fn store(&mut self, _dry_run: bool) -> Result<(), EntityError> {
//!         Ok(())
//!     }
//! }
//!
//! struct PageImport {
//!     path: PathBuf,
//!     run: ImportRun,
//! }
//!
//! impl ImportContext for PageImport {
//!     type Entity = Page;
//!
//!     fn datapath(&self) -> &Path {
//!         &self.path
//!     }
//!
//!     fn get(&self, _key: &str) -> Option<serde_json::Value> {
//!         None
//!     }
//!
//!     fn record(&self, raw: Record, _options: &ImportParams, _mode: ImportMode) -> Result<Page, EntityError> {
//!         Ok(Page {
//!             title: raw.get("title").unwrap_or_default().to_string(),
//!         })
//!     }
//!
//!     fn current_run(&self) -> &ImportRun {
//!         &self.run
//!     }
//! }
//!
//! # fn main() -> Result<(), content_import::ImportError> {
//! let ctx = PageImport {
//!     path: "pages.csv".into(),
//!     run: ImportRun::new(),
//! };
//! let adapter = CsvAdapter::default();
//!
//! println!("headers={:?} rows={}", adapter.headers(&ctx)?, adapter.count(&ctx)?);
//!
//! let callbacks = Callbacks::new().on_postmap(|mut page: Page, _dry_run| {
//!     page.title = page.title.trim().to_string();
//!     page
//! });
//! let pages = adapter.process(&ctx, &callbacks, true)?;
//! println!("would import {} pages ({})", pages.len(), ctx.current_run());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`import`]: adapter contract, CSV adapter, registry and observers
//! - [`source`]: record sources (CSV reader with skip markers)
//! - [`processing`]: callback chains and the row pipeline
//! - [`types`]: records, import mode and params
//! - [`auth`]: authentication factor lookup
//! - [`error`]: error types

pub mod auth;
pub mod error;
pub mod import;
pub mod processing;
pub mod source;
pub mod types;

pub use error::{EntityError, ImportError, ImportResult, RowStage};
