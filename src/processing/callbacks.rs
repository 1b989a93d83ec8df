//! Callback chains for the postparse/postmap/postconvert hook points.

use std::fmt;
use std::sync::Arc;

use crate::types::Record;

/// A user hook: receives a value and the dry-run flag, returns the (possibly modified) value.
pub type Callback<T> = Arc<dyn Fn(T, bool) -> T + Send + Sync>;

/// Ordered list of optional callbacks.
///
/// Empty slots (`None`) are hook points with nothing registered and are skipped by [`map`].
pub struct CallbackChain<T> {
    entries: Vec<Option<Callback<T>>>,
}

impl<T> CallbackChain<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a callback.
    pub fn push<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T, bool) -> T + Send + Sync + 'static,
    {
        self.entries.push(Some(Arc::new(f)));
        self
    }

    /// Append a raw entry; `None` keeps an empty slot.
    pub fn push_entry(&mut self, entry: Option<Callback<T>>) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Number of slots, empty ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots holding a callback.
    pub fn callable_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

impl<T> Default for CallbackChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CallbackChain<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for CallbackChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackChain")
            .field("slots", &self.entries.len())
            .field("callable", &self.callable_len())
            .finish()
    }
}

impl<T> FromIterator<Option<Callback<T>>> for CallbackChain<T> {
    fn from_iter<I: IntoIterator<Item = Option<Callback<T>>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Run `value` through every callback in `chain`, in order.
///
/// Each callback receives the output of the previous one and the unchanged `dry_run` flag.
pub fn map<T>(value: T, chain: &CallbackChain<T>, dry_run: bool) -> T {
    chain
        .entries
        .iter()
        .flatten()
        .fold(value, |acc, f| f(acc, dry_run))
}

/// The three hook points of an import run.
///
/// - `postparse`: raw [`Record`] straight from the source
/// - `postmap`: entity after materialization, before validation/storage
/// - `postconvert`: entity after it has been stored
pub struct Callbacks<E> {
    pub postparse: CallbackChain<Record>,
    pub postmap: CallbackChain<E>,
    pub postconvert: CallbackChain<E>,
}

impl<E> Callbacks<E> {
    pub fn new() -> Self {
        Self {
            postparse: CallbackChain::new(),
            postmap: CallbackChain::new(),
            postconvert: CallbackChain::new(),
        }
    }

    pub fn on_postparse<F>(mut self, f: F) -> Self
    where
        F: Fn(Record, bool) -> Record + Send + Sync + 'static,
    {
        self.postparse.push(f);
        self
    }

    pub fn on_postmap<F>(mut self, f: F) -> Self
    where
        F: Fn(E, bool) -> E + Send + Sync + 'static,
    {
        self.postmap.push(f);
        self
    }

    pub fn on_postconvert<F>(mut self, f: F) -> Self
    where
        F: Fn(E, bool) -> E + Send + Sync + 'static,
    {
        self.postconvert.push(f);
        self
    }
}

impl<E> Default for Callbacks<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Callbacks<E> {
    fn clone(&self) -> Self {
        Self {
            postparse: self.postparse.clone(),
            postmap: self.postmap.clone(),
            postconvert: self.postconvert.clone(),
        }
    }
}

impl<E> fmt::Debug for Callbacks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("postparse", &self.postparse)
            .field("postmap", &self.postmap)
            .field("postconvert", &self.postconvert)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{map, Callback, CallbackChain};
    use crate::types::Record;

    #[test]
    fn callbacks_run_in_order_on_previous_output() {
        let mut chain = CallbackChain::<Record>::new();
        chain
            .push(|mut r, _| {
                r.set("name", "ALICE");
                r
            })
            .push(|mut r, _| {
                // Must see f1's output, never the raw record.
                let seen = r.get("name").unwrap_or_default().to_string();
                r.set("seen_by_second", seen);
                r
            });

        let out = map(Record::from_pairs([("name", "alice")]), &chain, false);
        assert_eq!(out.get("seen_by_second"), Some("ALICE"));
    }

    #[test]
    fn empty_slots_are_skipped() {
        let cb: Callback<i64> = Arc::new(|v: i64, _: bool| v + 1);
        let chain: CallbackChain<i64> = vec![None, Some(cb.clone()), None, Some(cb)]
            .into_iter()
            .collect();

        assert_eq!(chain.len(), 4);
        assert_eq!(chain.callable_len(), 2);
        assert_eq!(map(0, &chain, false), 2);
    }

    #[test]
    fn dry_run_flag_reaches_every_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = CallbackChain::<()>::new();
        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            chain.push(move |v, dry_run| {
                seen.lock().unwrap().push(dry_run);
                v
            });
        }

        map((), &chain, true);
        assert_eq!(*seen.lock().unwrap(), vec![true, true, true]);
    }
}
