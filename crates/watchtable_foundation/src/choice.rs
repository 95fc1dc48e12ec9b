//! String-backed enum selections.
//!
//! Editors persist an enum selection as its name so that reordering or
//! renumbering the enum does not corrupt stored data. [`EnumChoice`] keeps
//! that string and converts to the real enum only on request.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A stored enum selection.
pub struct EnumChoice<E> {
    raw: String,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Clone for EnumChoice<E> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<E> PartialEq for EnumChoice<E> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<E> Eq for EnumChoice<E> {}

impl<E> fmt::Debug for EnumChoice<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumChoice").field(&self.raw).finish()
    }
}

impl<E> EnumChoice<E> {
    /// Wraps a stored string without checking it.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            _marker: PhantomData,
        }
    }

    /// The stored string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consumes the choice, returning the stored string.
    #[must_use]
    pub fn into_raw(self) -> String {
        self.raw
    }
}

impl<E: fmt::Display> EnumChoice<E> {
    /// Stores `value` by name.
    #[must_use]
    pub fn new(value: &E) -> Self {
        Self::from_raw(value.to_string())
    }

    /// Replaces the selection.
    pub fn set(&mut self, value: &E) {
        self.raw = value.to_string();
    }
}

impl<E: FromStr> EnumChoice<E> {
    /// Parses the stored string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ErrorKind::InvalidChoice`] if the string does not name
    /// a variant of `E`.
    pub fn value(&self) -> Result<E> {
        self.raw
            .parse()
            .map_err(|_| Error::invalid_choice(short_type_name::<E>(), self.raw.clone()))
    }

    /// Returns true if the stored string parses.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.raw.parse::<E>().is_ok()
    }
}

impl<E: fmt::Display> From<E> for EnumChoice<E> {
    fn from(value: E) -> Self {
        Self::new(&value)
    }
}

impl<E> fmt::Display for EnumChoice<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn short_type_name<E>() -> &'static str {
    let full = type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(feature = "serde")]
impl<E> Serialize for EnumChoice<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(feature = "serde")]
impl<'de, E> Deserialize<'de> for EnumChoice<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_raw)
    }
}
