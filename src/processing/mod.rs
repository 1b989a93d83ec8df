//! Record processing: callback chains and the row pipeline.
//!
//! - [`map()`]: run a value through a [`CallbackChain`]
//! - [`run()`]: drive a [`crate::source::RecordSource`] through the full import pipeline
//!
//! ## Example: postparse chain
//!
//! ```rust
//! use content_import::processing::{map, CallbackChain};
//! use content_import::types::Record;
//!
//! let mut chain = CallbackChain::<Record>::new();
//! chain
//!     .push(|mut r, _dry_run| {
//!         let name = r.get("name").unwrap_or_default().trim().to_string();
//!         r.set("name", name);
//!         r
//!     })
//!     .push_entry(None) // empty hook slot, skipped
//!     .push(|mut r, dry_run| {
//!         r.set("dry_run", dry_run.to_string());
//!         r
//!     });
//!
//! let out = map(Record::from_pairs([("name", "  Ada ")]), &chain, true);
//! assert_eq!(out.get("name"), Some("Ada"));
//! assert_eq!(out.get("dry_run"), Some("true"));
//! ```

pub mod callbacks;
pub mod pipeline;

pub use callbacks::{map, Callback, CallbackChain, Callbacks};
pub use pipeline::{run, FailurePolicy, ProcessReport, RowFailure};
