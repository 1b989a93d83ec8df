//! Authentication factor model.

use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ImportError, ImportResult};

/// One authentication factor registered by a user for a domain (e.g. `"totp"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub id: u64,
    pub user_id: u64,
    pub domain: String,
    /// Identifier of the factor within its domain.
    #[serde(default)]
    pub factor_id: Option<String>,
    /// Domain-specific payload.
    #[serde(default)]
    pub data: Value,
}

impl Factor {
    /// Table namespace.
    pub const NAMESPACE: &'static str = "auth";
    /// Table name (`<namespace>_factors`).
    pub const TABLE: &'static str = "auth_factors";

    /// Column value used for equality filters.
    fn column(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "user_id" => Some(self.user_id.to_string()),
            "domain" => Some(self.domain.clone()),
            "factor_id" => self.factor_id.clone(),
            _ => None,
        }
    }
}

/// Equality-only query against the factor table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorQuery {
    filters: Vec<(String, String)>,
}

impl FactorQuery {
    /// Query matching every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_equals(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Does `factor` satisfy every filter? Unknown columns never match.
    pub fn matches(&self, factor: &Factor) -> bool {
        self.filters
            .iter()
            .all(|(col, want)| factor.column(col).as_deref() == Some(want.as_str()))
    }
}

/// Storage backend for factors.
pub trait FactorStore {
    /// First row matching `query`, materialized.
    fn first(&self, query: &FactorQuery) -> ImportResult<Option<Factor>>;
}

/// Find the factor `user_id` registered for `domain`.
///
/// Returns `Ok(None)` when the user has no factor for that domain.
pub fn current_or_fail_by_domain<S: FactorStore + ?Sized>(
    store: &S,
    user_id: u64,
    domain: &str,
) -> ImportResult<Option<Factor>> {
    let query = FactorQuery::all()
        .where_equals("user_id", user_id)
        .where_equals("domain", domain);
    store.first(&query)
}

/// Factor store backed by a vector; rows keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryFactorStore {
    rows: RwLock<Vec<Factor>>,
}

impl InMemoryFactorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, factor: Factor) -> ImportResult<()> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.push(factor);
        Ok(())
    }

    pub fn len(&self) -> ImportResult<usize> {
        Ok(self.read_rows()?.len())
    }

    pub fn is_empty(&self) -> ImportResult<bool> {
        Ok(self.read_rows()?.is_empty())
    }

    fn read_rows(&self) -> ImportResult<RwLockReadGuard<'_, Vec<Factor>>> {
        self.rows.read().map_err(|_| poisoned())
    }
}

fn poisoned() -> ImportError {
    ImportError::Storage {
        message: "factor store lock poisoned".to_string(),
    }
}

impl FactorStore for InMemoryFactorStore {
    fn first(&self, query: &FactorQuery) -> ImportResult<Option<Factor>> {
        Ok(self.read_rows()?.iter().find(|f| query.matches(f)).cloned())
    }
}
