//! Per-key and per-kind listener bookkeeping shared by every container.
//!
//! A [`ListenerRegistry`] keeps two kinds of registration:
//!
//! - **keyed**: `key -> kind -> [listener]`, fired only for mutations of that key
//! - **broadcast**: `kind -> [listener]`, fired for every mutation of that kind
//!
//! Registration order is invocation order. A listener registered twice is
//! invoked twice and has to be unregistered twice; [`ListenerRegistry::stop_observing_key`]
//! is the only bulk removal.
//!
//! Containers never call listeners while holding a borrow of their store or
//! registry. They take a [`Dispatch`] snapshot with [`ListenerRegistry::pending`]
//! and run it afterwards, so a listener may freely re-enter the container.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::update::{KindMap, UpdateKind};

type Callback<K, V> = dyn Fn(Option<&K>, &V) -> Result<()>;

/// A registered callback.
///
/// Cloning is cheap and yields the *same* listener: identity is the shared
/// allocation, which is what the `stop_*` operations compare against.
pub struct Listener<K, V> {
    callback: Rc<Callback<K, V>>,
}

impl<K, V> Clone for Listener<K, V> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<K, V> fmt::Debug for Listener<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("at", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

impl<K: 'static, V: 'static> Listener<K, V> {
    /// Wraps a fallible callback. An `Err` aborts the dispatch it runs in.
    #[must_use]
    pub fn new(callback: impl Fn(Option<&K>, &V) -> Result<()> + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Wraps a callback that cannot fail.
    #[must_use]
    pub fn infallible(callback: impl Fn(Option<&K>, &V) + 'static) -> Self {
        Self::new(move |key, value| {
            callback(key, value);
            Ok(())
        })
    }
}

impl<K, V> Listener<K, V> {
    /// Returns true if both handles refer to the same registration target.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }

    /// Invokes the callback.
    ///
    /// # Errors
    ///
    /// Returns whatever the callback returns.
    pub fn call(&self, key: Option<&K>, value: &V) -> Result<()> {
        (self.callback)(key, value)
    }
}

type Bucket<K, V> = Vec<Listener<K, V>>;

fn remove_first<K, V>(bucket: &mut Bucket<K, V>, listener: &Listener<K, V>) -> bool {
    match bucket.iter().position(|l| l.same(listener)) {
        Some(pos) => {
            bucket.remove(pos);
            true
        }
        None => false,
    }
}

/// Keyed and broadcast listeners for one container.
pub struct ListenerRegistry<K, V> {
    keyed: HashMap<K, KindMap<Bucket<K, V>>>,
    broadcast: KindMap<Bucket<K, V>>,
}

impl<K, V> Default for ListenerRegistry<K, V> {
    fn default() -> Self {
        Self {
            keyed: HashMap::new(),
            broadcast: KindMap::default(),
        }
    }
}

impl<K, V> fmt::Debug for ListenerRegistry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("keys", &self.keyed.len())
            .field("keyed", &self.keyed_len())
            .field("broadcast", &self.broadcast_len())
            .finish_non_exhaustive()
    }
}

impl<K, V> ListenerRegistry<K, V> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total keyed registrations across all keys and kinds.
    #[must_use]
    pub fn keyed_len(&self) -> usize {
        self.keyed
            .values()
            .flat_map(|kinds| kinds.iter().map(|(_, bucket)| bucket.len()))
            .sum()
    }

    /// Total broadcast registrations across all kinds.
    #[must_use]
    pub fn broadcast_len(&self) -> usize {
        self.broadcast.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    /// Total registrations of any sort.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyed_len() + self.broadcast_len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a broadcast listener for `kind`.
    pub fn observe_any(&mut self, kind: UpdateKind, listener: &Listener<K, V>) {
        self.broadcast.get_mut(kind).push(listener.clone());
    }

    /// Removes one broadcast registration of `listener` for `kind`.
    ///
    /// Returns false if it was not registered.
    pub fn stop_observing_any(&mut self, kind: UpdateKind, listener: &Listener<K, V>) -> bool {
        remove_first(self.broadcast.get_mut(kind), listener)
    }

    /// Number of broadcast registrations for `kind`.
    #[must_use]
    pub fn broadcast_count(&self, kind: UpdateKind) -> usize {
        self.broadcast.get(kind).len()
    }

    /// Drops every registration, keyed and broadcast.
    pub fn clear(&mut self) {
        self.keyed.clear();
        for bucket in self.broadcast.values_mut() {
            bucket.clear();
        }
    }
}

impl<K: Eq + Hash, V> ListenerRegistry<K, V> {
    /// Registers `listener` for mutations of `key` with the given `kind`.
    ///
    /// The key does not have to exist in the store yet.
    pub fn observe(&mut self, key: K, kind: UpdateKind, listener: &Listener<K, V>) {
        self.keyed
            .entry(key)
            .or_default()
            .get_mut(kind)
            .push(listener.clone());
    }

    /// Removes one keyed registration of `listener` for `(key, kind)`.
    ///
    /// Returns false if it was not registered.
    pub fn stop_observing(&mut self, key: &K, kind: UpdateKind, listener: &Listener<K, V>) -> bool {
        let Some(kinds) = self.keyed.get_mut(key) else {
            return false;
        };
        let removed = remove_first(kinds.get_mut(kind), listener);
        if kinds.iter().all(|(_, bucket)| bucket.is_empty()) {
            self.keyed.remove(key);
        }
        removed
    }

    /// Clears every keyed bucket for `key`. Broadcast listeners are unaffected.
    ///
    /// Returns the number of registrations dropped.
    pub fn stop_observing_key(&mut self, key: &K) -> usize {
        let Some(kinds) = self.keyed.remove(key) else {
            return 0;
        };
        kinds.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    /// Number of keyed registrations for `(key, kind)`.
    #[must_use]
    pub fn keyed_count(&self, key: &K, kind: UpdateKind) -> usize {
        self.keyed.get(key).map_or(0, |kinds| kinds.get(kind).len())
    }

    /// Snapshots the listeners a mutation of `(key, kind)` must run:
    /// keyed listeners first, then broadcast listeners, each in registration order.
    ///
    /// `None` skips the keyed lookup (unkeyed containers).
    #[must_use]
    pub fn pending(&self, key: Option<&K>, kind: UpdateKind) -> Dispatch<K, V> {
        let keyed = key
            .and_then(|k| self.keyed.get(k))
            .map(|kinds| kinds.get(kind).as_slice())
            .unwrap_or_default();
        let broadcast = self.broadcast.get(kind);

        let mut listeners = Vec::with_capacity(keyed.len() + broadcast.len());
        listeners.extend_from_slice(keyed);
        listeners.extend_from_slice(broadcast);
        Dispatch { kind, listeners }
    }
}

/// A snapshot of listeners due to run for one mutation.
#[must_use = "a dispatch does nothing until it is run"]
pub struct Dispatch<K, V> {
    kind: UpdateKind,
    listeners: Vec<Listener<K, V>>,
}

impl<K, V> Dispatch<K, V> {
    /// The kind being dispatched.
    #[must_use]
    pub const fn kind(&self) -> UpdateKind {
        self.kind
    }

    /// Number of listeners in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener will run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first listener error; later listeners do not run.
    pub fn run(self, key: Option<&K>, value: &V) -> Result<()> {
        if self.listeners.is_empty() {
            return Ok(());
        }
        trace!(kind = %self.kind, listeners = self.listeners.len(), "dispatching update");
        for (position, listener) in self.listeners.iter().enumerate() {
            if let Err(error) = listener.call(key, value) {
                debug!(kind = %self.kind, position, %error, "listener aborted dispatch");
                return Err(error);
            }
        }
        Ok(())
    }
}
