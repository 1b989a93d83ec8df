//! Authentication models.

pub mod factor;

pub use factor::{current_or_fail_by_domain, Factor, FactorQuery, FactorStore, InMemoryFactorStore};
