//! Typed configuration registry for Watchtable.
//!
//! This crate provides:
//! - [`ConfigRow`] - A row type that derives its own key
//! - [`ConfigTable`] - An immutable keyed collection of rows
//! - [`ConfigRegistry`] - One table per row type, looked up by type
//!
//! Configuration never notifies anyone. Tables are used to seed containers
//! ([`ConfigTable::to_id_list`], [`ConfigTable::to_dictionary`]), which then
//! notify as usual.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod registry;
pub mod table;

pub use registry::ConfigRegistry;
pub use table::{ConfigRow, ConfigTable};
