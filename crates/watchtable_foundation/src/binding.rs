//! How a container reaches its backing store.
//!
//! A [`StorageBinding`] is either **direct** (the container holds the store,
//! fixed at construction) or **deferred** (an accessor is asked for the
//! current store on every access). Deferred bindings let a container exist
//! before its store does, and let the store's owner swap it out without
//! rebuilding the container. Containers never cache a resolved store across
//! calls.
//!
//! [`StoreSlot`] is the usual way to get a deferred binding: the owner keeps
//! the slot, fills or replaces it whenever it likes, and hands
//! [`StoreSlot::binding`] to the container.

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

type Accessor<S> = dyn Fn() -> Option<Rc<RefCell<S>>>;

/// The storage strategy of a container.
pub enum StorageBinding<S> {
    /// The store is held directly.
    Direct(Rc<RefCell<S>>),
    /// The store is resolved through an accessor on every access.
    Deferred(Rc<Accessor<S>>),
}

impl<S> Clone for StorageBinding<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Direct(store) => Self::Direct(Rc::clone(store)),
            Self::Deferred(accessor) => Self::Deferred(Rc::clone(accessor)),
        }
    }
}

impl<S> fmt::Debug for StorageBinding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("StorageBinding::Direct"),
            Self::Deferred(_) => f.write_str("StorageBinding::Deferred"),
        }
    }
}

impl<S> StorageBinding<S> {
    /// Takes ownership of `store`.
    #[must_use]
    pub fn direct(store: S) -> Self {
        Self::Direct(Rc::new(RefCell::new(store)))
    }

    /// Binds to a store owned elsewhere. The reference is fixed; use
    /// [`StorageBinding::deferred`] or [`StoreSlot`] if it may be replaced.
    #[must_use]
    pub fn shared(store: Rc<RefCell<S>>) -> Self {
        Self::Direct(store)
    }

    /// Binds through `accessor`, which may return `None` while the store
    /// does not exist yet.
    #[must_use]
    pub fn deferred(accessor: impl Fn() -> Option<Rc<RefCell<S>>> + 'static) -> Self {
        Self::Deferred(Rc::new(accessor))
    }

    /// Returns true for deferred bindings.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Resolves the current store.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StorageUnresolved`] if a deferred accessor has
    /// nothing to give.
    pub fn resolve(&self) -> Result<Rc<RefCell<S>>> {
        match self {
            Self::Direct(store) => Ok(Rc::clone(store)),
            Self::Deferred(accessor) => {
                accessor().ok_or_else(|| Error::storage_unresolved(type_name::<S>()))
            }
        }
    }

    /// Returns true if [`StorageBinding::resolve`] would succeed right now.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        match self {
            Self::Direct(_) => true,
            Self::Deferred(accessor) => accessor().is_some(),
        }
    }

    /// Resolves the store and runs `f` against a shared borrow of it.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or if someone outside the
    /// container holds a mutable borrow of it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        let store = self.resolve()?;
        let guard = store.try_borrow().map_err(|_| busy::<S>())?;
        Ok(f(&guard))
    }

    /// Resolves the store and runs `f` against a mutable borrow of it.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be resolved, or if someone outside the
    /// container holds a borrow of it.
    pub fn write<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let store = self.resolve()?;
        let mut guard = store.try_borrow_mut().map_err(|_| busy::<S>())?;
        Ok(f(&mut guard))
    }
}

fn busy<S>() -> Error {
    Error::new(ErrorKind::Internal(format!(
        "store {} is borrowed elsewhere",
        type_name::<S>()
    )))
}

/// A replaceable home for a store, shared between its owner and any
/// containers bound to it.
pub struct StoreSlot<S> {
    current: Rc<RefCell<Option<Rc<RefCell<S>>>>>,
}

impl<S> Clone for StoreSlot<S> {
    fn clone(&self) -> Self {
        Self {
            current: Rc::clone(&self.current),
        }
    }
}

impl<S> Default for StoreSlot<S> {
    fn default() -> Self {
        Self {
            current: Rc::new(RefCell::new(None)),
        }
    }
}

impl<S> fmt::Debug for StoreSlot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSlot")
            .field("installed", &self.is_installed())
            .finish_non_exhaustive()
    }
}

impl<S> StoreSlot<S> {
    /// Returns true if a store is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Returns the installed store, if any.
    #[must_use]
    pub fn get(&self) -> Option<Rc<RefCell<S>>> {
        self.current.borrow().clone()
    }
}

impl<S: 'static> StoreSlot<S> {
    /// Creates an empty slot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a slot already holding `store`.
    #[must_use]
    pub fn filled(store: S) -> Self {
        let slot = Self::default();
        slot.install(store);
        slot
    }

    /// Puts `store` in the slot, returning whatever was there.
    #[allow(clippy::must_use_candidate)]
    pub fn install(&self, store: S) -> Option<Rc<RefCell<S>>> {
        self.install_shared(Rc::new(RefCell::new(store)))
    }

    /// Puts an already-shared store in the slot, returning whatever was there.
    #[allow(clippy::must_use_candidate)]
    pub fn install_shared(&self, store: Rc<RefCell<S>>) -> Option<Rc<RefCell<S>>> {
        let previous = self.current.borrow_mut().replace(store);
        debug!(
            store = type_name::<S>(),
            replaced = previous.is_some(),
            "store installed"
        );
        previous
    }

    /// Empties the slot. Bound containers fail with
    /// [`ErrorKind::StorageUnresolved`] until something is installed again.
    #[allow(clippy::must_use_candidate)]
    pub fn take(&self) -> Option<Rc<RefCell<S>>> {
        let previous = self.current.borrow_mut().take();
        if previous.is_some() {
            debug!(store = type_name::<S>(), "store taken");
        }
        previous
    }

    /// A deferred binding that resolves to whatever this slot holds at the
    /// time of each access.
    #[must_use]
    pub fn binding(&self) -> StorageBinding<S> {
        let slot = self.clone();
        StorageBinding::deferred(move || slot.get())
    }
}
