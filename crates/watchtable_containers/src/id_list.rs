//! A sequence whose elements carry their own key.
//!
//! The key is derived from each element by a caller-supplied function, not
//! stored alongside it. Every lookup is a linear scan over the backing
//! sequence: in exchange, the store can be whatever ordered representation
//! its owner already has (configuration rows, a persistent vector, ...).
//!
//! At most one element per key is allowed. [`IdList::add`] enforces this;
//! [`IdList::set`] upserts in place. Mutating the backing store directly, or
//! with a key function that is not pure, can break the invariant.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::debug;
use watchtable_foundation::{Error, Listener, Result, Sequence, StorageBinding, UpdateKind};

use crate::observers::Observers;

const CONTAINER: &str = "IdList";

type KeyFn<K, V> = dyn Fn(&V) -> K;

/// Listener type for id lists.
pub type IdListener<K, V> = Listener<K, V>;

/// An observable, key-addressed sequence.
///
/// Clones share the store, the key function, and the listeners.
pub struct IdList<K, V, S = Vec<V>> {
    binding: StorageBinding<S>,
    key_of: Rc<KeyFn<K, V>>,
    observers: Observers<K, V>,
}

impl<K, V, S> Clone for IdList<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            key_of: Rc::clone(&self.key_of),
            observers: self.observers.clone(),
        }
    }
}

impl<K, V, S: Sequence<V>> fmt::Debug for IdList<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(CONTAINER);
        match self.binding.read(S::len) {
            Ok(count) => s.field("count", &count),
            Err(_) => s.field("count", &format_args!("<unresolved>")),
        };
        s.field("listeners", &self.observers.len()).finish_non_exhaustive()
    }
}

impl<K, V, S> IdList<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    S: Sequence<V> + Default,
{
    /// Creates an empty list keyed by `key_of`.
    #[must_use]
    pub fn new(key_of: impl Fn(&V) -> K + 'static) -> Self {
        Self::from_store(key_of, S::default())
    }

    /// Creates a list from `values`, rejecting repeated keys.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` on the first repeated key.
    pub fn from_values(
        key_of: impl Fn(&V) -> K + 'static,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let list = Self::new(key_of);
        list.binding.write(|store| {
            for value in values {
                let key = (list.key_of)(&value);
                if store.position(|v| (list.key_of)(v) == key).is_some() {
                    return Err(Error::duplicate_key(&key).during(CONTAINER, "from_values"));
                }
                store.push(value);
            }
            Ok(())
        })??;
        Ok(list)
    }
}

impl<K, V, S> IdList<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    S: Sequence<V>,
{
    /// Wraps an existing store as-is. Key uniqueness is not checked.
    #[must_use]
    pub fn from_store(key_of: impl Fn(&V) -> K + 'static, store: S) -> Self {
        Self::bound(key_of, StorageBinding::direct(store))
    }

    /// Creates a list over an existing binding.
    #[must_use]
    pub fn bound(key_of: impl Fn(&V) -> K + 'static, binding: StorageBinding<S>) -> Self {
        Self {
            binding,
            key_of: Rc::new(key_of),
            observers: Observers::default(),
        }
    }

    /// Derives the key of `value`.
    #[must_use]
    pub fn key_of(&self, value: &V) -> K {
        (self.key_of)(value)
    }

    fn find(&self, store: &S, key: &K) -> Option<usize> {
        store.position(|v| (self.key_of)(v) == *key)
    }

    /// Number of elements.
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

    /// The element for `key`, if present.
    ///
    /// # Errors
    ///
    /// Absence is not an error; this fails only if the store cannot be resolved.
    pub fn try_get(&self, key: &K) -> Result<Option<V>> {
        self.binding.read(|store| {
            self.find(store, key)
                .and_then(|index| store.get(index).cloned())
        })
    }

    /// The element for `key`.
    ///
    /// # Errors
    ///
    /// Fails with `KeyNotFound` if absent.
    pub fn get(&self, key: &K) -> Result<V> {
        self.try_get(key)?
            .ok_or_else(|| Error::key_not_found(key).during(CONTAINER, "get"))
    }

    /// Returns true if an element has `key`.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        self.binding.read(|store| self.find(store, key).is_some())
    }

    /// Keys in sequence order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn keys(&self) -> Result<Vec<K>> {
        self.binding.read(|store| {
            (0..store.len())
                .filter_map(|index| store.get(index).map(|v| (self.key_of)(v)))
                .collect()
        })
    }

    /// Elements in sequence order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn values(&self) -> Result<Vec<V>> {
        self.binding.read(|store| {
            (0..store.len())
                .filter_map(|index| store.get(index).cloned())
                .collect()
        })
    }

    /// Runs `f` against the store without copying it out.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        self.binding.read(f)
    }

    /// Upserts `value` under its derived key.
    ///
    /// An existing element is replaced at its current position and
    /// `Updated(key, value)` fires. An absent key is appended exactly as
    /// [`IdList::add`] would, and `Added(key, value)` fires.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or with the first listener error.
    pub fn set(&self, value: V) -> Result<()> {
        let key = self.key_of(&value);
        let stored = value.clone();
        let kind = self.binding.write(|store| match self.find(store, &key) {
            Some(index) => {
                store.replace(index, stored);
                UpdateKind::Updated
            }
            None => {
                store.push(stored);
                UpdateKind::Added
            }
        })?;
        self.observers.notify(Some(&key), kind, &value)
    }

    /// Appends `value` and fires `Added(key, value)`.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` if the derived key is already present; the
    /// list is left unchanged and nothing fires.
    pub fn add(&self, value: V) -> Result<()> {
        let key = self.key_of(&value);
        let stored = value.clone();
        self.binding
            .write(|store| {
                if self.find(store, &key).is_some() {
                    return Err(Error::duplicate_key(&key));
                }
                store.push(stored);
                Ok(())
            })?
            .map_err(|e| rejected(e, "add"))?;
        self.observers.notify(Some(&key), UpdateKind::Added, &value)
    }

    /// Removes the element for `key` and fires `Removed(key, removed)`.
    ///
    /// # Errors
    ///
    /// Fails with `KeyNotFound` if absent.
    pub fn remove(&self, key: &K) -> Result<V> {
        self.try_remove(key)?
            .ok_or_else(|| rejected(Error::key_not_found(key), "remove"))
    }

    /// Like [`IdList::remove`], but absence is a silent no-op.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or with the first listener error.
    pub fn try_remove(&self, key: &K) -> Result<Option<V>> {
        let removed = self.binding.write(|store| {
            self.find(store, key).and_then(|index| store.remove(index))
        })?;
        match removed {
            Some(value) => {
                self.observers
                    .notify(Some(key), UpdateKind::Removed, &value)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Removes the element sharing `value`'s key, if any.
    ///
    /// Returns whether something was removed.
    ///
    /// # Errors
    ///
    /// As [`IdList::try_remove`].
    pub fn remove_if_present(&self, value: &V) -> Result<bool> {
        let key = self.key_of(value);
        Ok(self.try_remove(&key)?.is_some())
    }

    /// Registers `listener` for `(key, kind)`. The key need not exist yet.
    pub fn observe(&self, key: K, kind: UpdateKind, listener: &IdListener<K, V>) {
        self.observers.observe(key, kind, listener);
    }

    /// Invokes `listener` with the current element for `key`, then registers it.
    ///
    /// # Errors
    ///
    /// Fails with `KeyNotFound` if absent. If the listener itself fails it is
    /// not registered.
    pub fn observe_and_fire_now(
        &self,
        key: K,
        kind: UpdateKind,
        listener: &IdListener<K, V>,
    ) -> Result<()> {
        let current = self
            .try_get(&key)?
            .ok_or_else(|| Error::key_not_found(&key).during(CONTAINER, "observe_and_fire_now"))?;
        listener.call(Some(&key), &current)?;
        self.observers.observe(key, kind, listener);
        Ok(())
    }

    /// Registers a broadcast listener for `kind`.
    pub fn observe_any(&self, kind: UpdateKind, listener: &IdListener<K, V>) {
        self.observers.observe_any(kind, listener);
    }

    /// Removes one keyed registration. Returns false if there was none.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing(&self, key: &K, kind: UpdateKind, listener: &IdListener<K, V>) -> bool {
        self.observers.stop_observing(key, kind, listener)
    }

    /// Removes one broadcast registration. Returns false if there was none.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing_any(&self, kind: UpdateKind, listener: &IdListener<K, V>) -> bool {
        self.observers.stop_observing_any(kind, listener)
    }

    /// Drops every keyed listener for `key`, returning how many.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing_key(&self, key: &K) -> usize {
        self.observers.stop_observing_key(key)
    }

    /// Number of registered listeners, keyed and broadcast.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }
}

fn rejected(error: Error, operation: &'static str) -> Error {
    debug!(container = CONTAINER, operation, %error, "mutation rejected");
    error.during(CONTAINER, operation)
}
