//! A key-addressed observable map.
//!
//! Update kinds follow what actually happened to the key: [`ObservableDictionary::set`]
//! reports `Added` when the key was absent and `Updated` when it replaced a
//! value, and [`ObservableDictionary::remove`] of an absent key reports nothing.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;
use watchtable_foundation::{Error, KeyedStore, Listener, Result, StorageBinding, UpdateKind};

use crate::observers::Observers;

const CONTAINER: &str = "ObservableDictionary";

/// Listener type for dictionaries.
pub type DictionaryListener<K, V> = Listener<K, V>;

/// An observable map over any [`KeyedStore`].
///
/// Clones share the store and the listeners.
pub struct ObservableDictionary<K, V, M = HashMap<K, V>> {
    binding: StorageBinding<M>,
    observers: Observers<K, V>,
}

impl<K, V, M> Clone for ObservableDictionary<K, V, M> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<K, V, M: KeyedStore<K, V>> fmt::Debug for ObservableDictionary<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(CONTAINER);
        match self.binding.read(M::len) {
            Ok(count) => s.field("count", &count),
            Err(_) => s.field("count", &format_args!("<unresolved>")),
        };
        s.field("listeners", &self.observers.len()).finish_non_exhaustive()
    }
}

impl<K, V, M> ObservableDictionary<K, V, M>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    M: KeyedStore<K, V> + Default,
{
    /// Creates a dictionary owning an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(M::default())
    }

    /// Creates a dictionary from `entries`, rejecting repeated keys.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` on the first repeated key.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self> {
        let mut store = M::default();
        for (key, value) in entries {
            if store.contains_key(&key) {
                return Err(Error::duplicate_key(&key).during(CONTAINER, "from_entries"));
            }
            store.insert(key, value);
        }
        Ok(Self::from_store(store))
    }
}

impl<K, V, M> Default for ObservableDictionary<K, V, M>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    M: KeyedStore<K, V> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, M> ObservableDictionary<K, V, M>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    M: KeyedStore<K, V>,
{
    /// Creates a dictionary owning `store`.
    #[must_use]
    pub fn from_store(store: M) -> Self {
        Self::bound(StorageBinding::direct(store))
    }

    /// Creates a dictionary over an existing binding.
    #[must_use]
    pub fn bound(binding: StorageBinding<M>) -> Self {
        Self {
            binding,
            observers: Observers::default(),
        }
    }

    /// Number of entries.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn count(&self) -> Result<usize> {
        self.binding.read(M::len)
    }

    /// Returns true if the dictionary has no entries.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn is_empty(&self) -> Result<bool> {
        self.binding.read(M::is_empty)
    }

    /// The value for `key`, if present.
    ///
    /// # Errors
    ///
    /// Absence is not an error; this fails only if the store cannot be resolved.
    pub fn try_get(&self, key: &K) -> Result<Option<V>> {
        self.binding.read(|store| store.get(key).cloned())
    }

    /// The value for `key`.
    ///
    /// # Errors
    ///
    /// Fails with `KeyNotFound` if absent.
    pub fn get(&self, key: &K) -> Result<V> {
        self.try_get(key)?
            .ok_or_else(|| Error::key_not_found(key).during(CONTAINER, "get"))
    }

    /// Returns true if `key` has a value. Never notifies.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        self.binding.read(|store| store.contains_key(key))
    }

    /// Keys in the store's iteration order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn keys(&self) -> Result<Vec<K>> {
        self.binding.read(M::keys)
    }

    /// Runs `f` against the store without copying it out.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved.
    pub fn read<R>(&self, f: impl FnOnce(&M) -> R) -> Result<R> {
        self.binding.read(f)
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// Fires `Updated(key, value)` if a value was replaced, or
    /// `Added(key, value)` if the key was absent.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or with the first listener error.
    pub fn set(&self, key: K, value: V) -> Result<()> {
        let stored = value.clone();
        let previous = self
            .binding
            .write(|store| store.insert(key.clone(), stored))?;
        let kind = if previous.is_some() {
            UpdateKind::Updated
        } else {
            UpdateKind::Added
        };
        self.observers.notify(Some(&key), kind, &value)
    }

    /// Inserts a new entry and fires `Added(key, value)`.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` if `key` is present; the dictionary is left
    /// unchanged and nothing fires.
    pub fn add(&self, key: K, value: V) -> Result<()> {
        let stored = value.clone();
        self.binding
            .write(|store| {
                if store.contains_key(&key) {
                    return Err(Error::duplicate_key(&key));
                }
                store.insert(key.clone(), stored);
                Ok(())
            })?
            .map_err(|error| {
                debug!(container = CONTAINER, operation = "add", %error, "mutation rejected");
                error.during(CONTAINER, "add")
            })?;
        self.observers.notify(Some(&key), UpdateKind::Added, &value)
    }

    /// Removes `key`, firing `Removed(key, removed)` if it was present.
    ///
    /// Returns whether anything was removed. Removing an absent key is a
    /// no-op: nothing fires.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or with the first listener error.
    pub fn remove(&self, key: &K) -> Result<bool> {
        Ok(self.take(key)?.is_some())
    }

    /// Like [`ObservableDictionary::remove`], returning the removed value.
    ///
    /// # Errors
    ///
    /// As [`ObservableDictionary::remove`].
    pub fn take(&self, key: &K) -> Result<Option<V>> {
        let removed = self.binding.write(|store| store.remove(key))?;
        if let Some(value) = &removed {
            self.observers
                .notify(Some(key), UpdateKind::Removed, value)?;
        }
        Ok(removed)
    }

    /// Registers `listener` for `(key, kind)`. The key need not exist yet.
    pub fn observe(&self, key: K, kind: UpdateKind, listener: &DictionaryListener<K, V>) {
        self.observers.observe(key, kind, listener);
    }

    /// Invokes `listener` with the current value for `key`, then registers it.
    ///
    /// # Errors
    ///
    /// Fails with `KeyNotFound` if absent. If the listener itself fails it is
    /// not registered.
    pub fn observe_and_fire_now(
        &self,
        key: K,
        kind: UpdateKind,
        listener: &DictionaryListener<K, V>,
    ) -> Result<()> {
        let current = self
            .try_get(&key)?
            .ok_or_else(|| Error::key_not_found(&key).during(CONTAINER, "observe_and_fire_now"))?;
        listener.call(Some(&key), &current)?;
        self.observers.observe(key, kind, listener);
        Ok(())
    }

    /// Registers a broadcast listener for `kind`.
    pub fn observe_any(&self, kind: UpdateKind, listener: &DictionaryListener<K, V>) {
        self.observers.observe_any(kind, listener);
    }

    /// Removes one keyed registration. Returns false if there was none.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing(
        &self,
        key: &K,
        kind: UpdateKind,
        listener: &DictionaryListener<K, V>,
    ) -> bool {
        self.observers.stop_observing(key, kind, listener)
    }

    /// Removes one broadcast registration. Returns false if there was none.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing_any(
        &self,
        kind: UpdateKind,
        listener: &DictionaryListener<K, V>,
    ) -> bool {
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
