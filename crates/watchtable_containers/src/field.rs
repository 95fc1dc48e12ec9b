//! A single observable value.
//!
//! A field has no key and nothing to add or remove: the only update it ever
//! reports is [`UpdateKind::Updated`], fired on every [`ObservableField::set`]
//! whether or not the value actually changed. Listeners receive `None` as
//! their key.

use std::fmt;
use std::rc::Rc;

use tracing::trace;
use watchtable_foundation::{Error, Listener, Result, StorageBinding, UpdateKind};

use crate::observers::Observers;

const CONTAINER: &str = "ObservableField";

type Getter<T> = dyn Fn() -> Result<T>;
type Setter<T> = dyn Fn(T) -> Result<()>;

/// Where a field's value lives.
enum FieldSource<T> {
    Bound(StorageBinding<T>),
    Accessors {
        get: Rc<Getter<T>>,
        set: Rc<Setter<T>>,
    },
}

impl<T> Clone for FieldSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Bound(binding) => Self::Bound(binding.clone()),
            Self::Accessors { get, set } => Self::Accessors {
                get: Rc::clone(get),
                set: Rc::clone(set),
            },
        }
    }
}

/// Listener type for fields.
pub type FieldListener<T> = Listener<(), T>;

/// A single-slot observable container.
///
/// Clones share the value and the listeners.
pub struct ObservableField<T> {
    source: FieldSource<T>,
    observers: Observers<(), T>,
}

impl<T> Clone for ObservableField<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for ObservableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(CONTAINER);
        match self.get() {
            Ok(value) => s.field("value", &value),
            Err(_) => s.field("value", &format_args!("<unresolved>")),
        };
        s.field("listeners", &self.observers.len()).finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> ObservableField<T> {
    /// Creates a field owning `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::bound(StorageBinding::direct(initial))
    }

    /// Creates a field over an existing binding.
    #[must_use]
    pub fn bound(binding: StorageBinding<T>) -> Self {
        Self {
            source: FieldSource::Bound(binding),
            observers: Observers::default(),
        }
    }

    /// Creates a field over a getter/setter pair, for values that live inside
    /// some other object.
    #[must_use]
    pub fn from_accessors(
        get: impl Fn() -> Result<T> + 'static,
        set: impl Fn(T) -> Result<()> + 'static,
    ) -> Self {
        Self {
            source: FieldSource::Accessors {
                get: Rc::new(get),
                set: Rc::new(set),
            },
            observers: Observers::default(),
        }
    }

    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Fails if the backing store cannot be resolved or the getter fails.
    pub fn get(&self) -> Result<T> {
        match &self.source {
            FieldSource::Bound(binding) => binding.read(Clone::clone),
            FieldSource::Accessors { get, .. } => get(),
        }
    }

    /// Replaces the value and notifies [`UpdateKind::Updated`] listeners.
    ///
    /// There is no equality check; every call notifies.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be written, or with the first listener error.
    /// A listener error does not undo the write.
    pub fn set(&self, value: T) -> Result<()> {
        let stored = value.clone();
        match &self.source {
            FieldSource::Bound(binding) => binding.write(|slot| *slot = stored)?,
            FieldSource::Accessors { set, .. } => set(stored)?,
        }
        trace!(container = CONTAINER, "value set");
        self.observers.notify(None, UpdateKind::Updated, &value)
    }

    /// Read-modify-write through `f`, then notifies like [`ObservableField::set`].
    ///
    /// # Errors
    ///
    /// As [`ObservableField::get`] and [`ObservableField::set`].
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<()> {
        let mut value = self.get()?;
        f(&mut value);
        self.set(value)
    }

    /// Registers `listener` for `kind`.
    ///
    /// # Errors
    ///
    /// Only [`UpdateKind::Updated`] is meaningful for a field; other kinds
    /// fail with [`watchtable_foundation::ErrorKind::InvalidUpdateKind`].
    pub fn observe(&self, kind: UpdateKind, listener: &FieldListener<T>) -> Result<()> {
        check_kind(kind, "observe")?;
        self.observers.observe_any(kind, listener);
        Ok(())
    }

    /// Invokes `listener` with the current value, then registers it.
    ///
    /// # Errors
    ///
    /// As [`ObservableField::observe`] and [`ObservableField::get`]. If the
    /// listener itself fails it is not registered.
    pub fn observe_and_fire_now(
        &self,
        kind: UpdateKind,
        listener: &FieldListener<T>,
    ) -> Result<()> {
        check_kind(kind, "observe_and_fire_now")?;
        let value = self.get()?;
        listener.call(None, &value)?;
        self.observers.observe_any(kind, listener);
        Ok(())
    }

    /// Removes one registration of `listener`. Returns false if there was none.
    #[allow(clippy::must_use_candidate)]
    pub fn stop_observing(&self, kind: UpdateKind, listener: &FieldListener<T>) -> bool {
        self.observers.stop_observing_any(kind, listener)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }
}

fn check_kind(kind: UpdateKind, operation: &'static str) -> Result<()> {
    match kind {
        UpdateKind::Updated => Ok(()),
        UpdateKind::Added | UpdateKind::Removed => {
            Err(Error::invalid_update_kind(kind.to_string()).during(CONTAINER, operation))
        }
    }
}
