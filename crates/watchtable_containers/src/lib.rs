//! Observable containers for Watchtable.
//!
//! This crate provides:
//! - [`ObservableField`] - A single value, notifies on every set
//! - [`ObservableList`] - An index-addressed sequence
//! - [`IdList`] - A sequence addressed by a key derived from each element
//! - [`ObservableDictionary`] - A key-addressed map
//!
//! Every container reaches its store through a
//! [`StorageBinding`](watchtable_foundation::StorageBinding) and shares its
//! listener bookkeeping with the others. Mutations go through the container,
//! never the store directly, so that no change escapes notification.
//!
//! Listeners run synchronously, inside the mutating call, after the store has
//! been updated. They may call back into the container. Containers never drop
//! registrations on their own; whoever registers a listener must unregister it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dictionary;
pub mod field;
pub mod id_list;
pub mod list;
mod observers;

pub use dictionary::{DictionaryListener, ObservableDictionary};
pub use field::{FieldListener, ObservableField};
pub use id_list::{IdList, IdListener};
pub use list::{ListListener, ObservableList};
