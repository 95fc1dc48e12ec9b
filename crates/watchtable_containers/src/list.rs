//! An index-addressed observable sequence.
//!
//! Indices are positions, not identities: removing index `i` shifts every
//! later element down by one. Listeners receive the index as it was at the
//! moment of the mutation, so they must not hold on to it across further
//! structural changes. For the same reason there is no per-index observation,
//! only per-kind broadcast listeners.

use std::fmt;

use tracing::debug;
use watchtable_foundation::{Error, Listener, Result, Sequence, StorageBinding, UpdateKind};

use crate::observers::Observers;

const CONTAINER: &str = "ObservableList";

/// Listener type for lists. The key is the affected index.
pub type ListListener<T> = Listener<usize, T>;

/// An observable sequence over any [`Sequence`] store.
///
/// Clones share the store and the listeners.
pub struct ObservableList<T, S = Vec<T>> {
    binding: StorageBinding<S>,
    observers: Observers<usize, T>,
}

impl<T, S> Clone for ObservableList<T, S> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<T, S: Sequence<T>> fmt::Debug for ObservableList<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(CONTAINER);
        match self.binding.read(S::len) {
            Ok(count) => s.field("count", &count),
            Err(_) => s.field("count", &format_args!("<unresolved>")),
        };
        s.field("listeners", &self.observers.len()).finish_non_exhaustive()
    }
}

impl<T: Clone + 'static, S: Sequence<T> + Default> ObservableList<T, S> {
    /// Creates a list owning an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(S::default())
    }
}

impl<T: Clone + 'static, S: Sequence<T> + Default> Default for ObservableList<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static, S: Sequence<T>> ObservableList<T, S> {
    /// Creates a list owning `store`.
    #[must_use]
    pub fn from_store(store: S) -> Self {
        Self::bound(StorageBinding::direct(store))
    }

    /// Creates a list over an existing binding.
    #[must_use]
    pub fn bound(binding: StorageBinding<S>) -> Self {
        Self {
            binding,
            observers: Observers::default(),
        }
    }

    /// Current length.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn count(&self) -> Result<usize> {
        self.binding.read(S::len)
    }

    /// Returns true if the list has no elements.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn is_empty(&self) -> Result<bool> {
        self.binding.read(S::is_empty)
    }

    /// Element at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`watchtable_foundation::ErrorKind::IndexOutOfRange`] if
    /// `index >= count`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.binding
            .read(|store| {
                store
                    .get(index)
                    .cloned()
                    .ok_or_else(|| Error::index_out_of_range(index, store.len()))
            })?
            .map_err(|e| e.during(CONTAINER, "get"))
    }

    /// Runs `f` against the store without copying it out.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        self.binding.read(f)
    }

    /// Copies the elements out in order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.binding.read(|store| {
            (0..store.len())
                .filter_map(|index| store.get(index).cloned())
                .collect()
        })
    }

    /// Replaces the element at `index` and notifies `Updated(index, value)`.
    ///
    /// # Errors
    ///
    /// Fails with `IndexOutOfRange` (nothing changes, nothing fires), or with
    /// the first listener error.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        let stored = value.clone();
        self.binding
            .write(|store| {
                let length = store.len();
                store
                    .replace(index, stored)
                    .map(drop)
                    .ok_or_else(|| Error::index_out_of_range(index, length))
            })?
            .map_err(|e| rejected(e, "set"))?;
        self.observers
            .notify(Some(&index), UpdateKind::Updated, &value)
    }

    /// Appends `value` and notifies `Added(new_index, value)`.
    ///
    /// Returns the new element's index.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or with the first listener error.
    pub fn add(&self, value: T) -> Result<usize> {
        let stored = value.clone();
        let index = self.binding.write(|store| {
            store.push(stored);
            store.len() - 1
        })?;
        self.observers
            .notify(Some(&index), UpdateKind::Added, &value)?;
        Ok(index)
    }

    /// Removes the element at `index` and notifies `Removed(index, removed)`
    /// using the pre-removal index.
    ///
    /// # Errors
    ///
    /// Fails with `IndexOutOfRange` (nothing changes, nothing fires), or with
    /// the first listener error.
    pub fn remove_at(&self, index: usize) -> Result<T> {
        let removed = self
            .binding
            .write(|store| {
                let length = store.len();
                store
                    .remove(index)
                    .ok_or_else(|| Error::index_out_of_range(index, length))
            })?
            .map_err(|e| rejected(e, "remove_at"))?;
        self.observers
            .notify(Some(&index), UpdateKind::Removed, &removed)?;
        Ok(removed)
    }

    /// Registers a broadcast listener for `kind`.
    pub fn observe(&self, kind: UpdateKind, listener: &ListListener<T>) {
        self.observers.observe_any(kind, listener);
    }

    /// Removes one registration of `listener`. Returns false if there was none.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing(&self, kind: UpdateKind, listener: &ListListener<T>) -> bool {
        self.observers.stop_observing_any(kind, listener)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }
}

fn rejected(error: Error, operation: &'static str) -> Error {
    debug!(container = CONTAINER, operation, %error, "mutation rejected");
    error.during(CONTAINER, operation)
}
