//! Core vocabulary for Watchtable observable containers.
//!
//! This crate provides:
//! - [`UpdateKind`] - The Added/Updated/Removed taxonomy shared by every container
//! - [`ListenerRegistry`] - Keyed and broadcast listener bookkeeping
//! - [`StorageBinding`] - Direct or deferred access to a backing store
//! - [`Sequence`] and [`KeyedStore`] - The store shapes containers can wrap
//! - [`EnumChoice`] - String-backed enum selections
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod choice;
pub mod error;
pub mod listener;
pub mod store;
pub mod update;

pub use binding::{StorageBinding, StoreSlot};
pub use choice::EnumChoice;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use listener::{Dispatch, Listener, ListenerRegistry};
pub use store::{KeyedStore, Sequence};
pub use update::{KindMap, UpdateKind};
