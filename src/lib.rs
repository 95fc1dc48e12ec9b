//! Watchtable - observable in-memory containers
//!
//! This crate re-exports all layers of the Watchtable system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: watchtable_config     - Typed configuration tables, seeds containers
//! Layer 1: watchtable_containers - ObservableField, ObservableList, IdList, ObservableDictionary
//! Layer 0: watchtable_foundation - UpdateKind, ListenerRegistry, StorageBinding, Error
//! ```

pub use watchtable_config as config;
pub use watchtable_containers as containers;
pub use watchtable_foundation as foundation;
