//! Listener plumbing shared by every container.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use watchtable_foundation::{Listener, ListenerRegistry, Result, UpdateKind};

/// A container's listener registry behind a shared handle.
///
/// The registry is only borrowed long enough to register, unregister, or take
/// a dispatch snapshot, never while a listener runs.
pub(crate) struct Observers<K, V> {
    registry: Rc<RefCell<ListenerRegistry<K, V>>>,
}

impl<K, V> Clone for Observers<K, V> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<K, V> Default for Observers<K, V> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(ListenerRegistry::new())),
        }
    }
}

impl<K, V> Observers<K, V> {
    pub(crate) fn observe_any(&self, kind: UpdateKind, listener: &Listener<K, V>) {
        self.registry.borrow_mut().observe_any(kind, listener);
    }

    pub(crate) fn stop_observing_any(&self, kind: UpdateKind, listener: &Listener<K, V>) -> bool {
        self.registry.borrow_mut().stop_observing_any(kind, listener)
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().len()
    }
}

impl<K: Eq + Hash, V> Observers<K, V> {
    pub(crate) fn observe(&self, key: K, kind: UpdateKind, listener: &Listener<K, V>) {
        self.registry.borrow_mut().observe(key, kind, listener);
    }

    pub(crate) fn stop_observing(
        &self,
        key: &K,
        kind: UpdateKind,
        listener: &Listener<K, V>,
    ) -> bool {
        self.registry
            .borrow_mut()
            .stop_observing(key, kind, listener)
    }

    pub(crate) fn stop_observing_key(&self, key: &K) -> usize {
        self.registry.borrow_mut().stop_observing_key(key)
    }

    /// Runs every listener due for `(key, kind)` against `value`.
    pub(crate) fn notify(&self, key: Option<&K>, kind: UpdateKind, value: &V) -> Result<()> {
        let dispatch = self.registry.borrow().pending(key, kind);
        dispatch.run(key, value)
    }
}
