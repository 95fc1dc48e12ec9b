//! The shared update taxonomy.
//!
//! Every container classifies a mutation as one of three [`UpdateKind`]s.
//! [`KindMap`] holds one slot per kind and is what the listener registry
//! uses for its per-kind buckets.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Classification of a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UpdateKind {
    /// A new element appeared.
    Added,
    /// An existing element was replaced.
    Updated,
    /// An element was taken out.
    Removed,
}

impl UpdateKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Added, Self::Updated, Self::Removed];

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpdateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "added" => Ok(Self::Added),
            "updated" => Ok(Self::Updated),
            "removed" => Ok(Self::Removed),
            other => Err(Error::invalid_update_kind(format!("{other:?}"))),
        }
    }
}

impl TryFrom<u8> for UpdateKind {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(Self::Added),
            1 => Ok(Self::Updated),
            2 => Ok(Self::Removed),
            other => Err(Error::invalid_update_kind(other.to_string())),
        }
    }
}

/// One `T` per [`UpdateKind`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KindMap<T> {
    added: T,
    updated: T,
    removed: T,
}

impl<T> KindMap<T> {
    /// Creates a map with an explicit value for each kind.
    #[must_use]
    pub const fn new(added: T, updated: T, removed: T) -> Self {
        Self {
            added,
            updated,
            removed,
        }
    }

    /// Returns the slot for `kind`.
    #[must_use]
    pub const fn get(&self, kind: UpdateKind) -> &T {
        match kind {
            UpdateKind::Added => &self.added,
            UpdateKind::Updated => &self.updated,
            UpdateKind::Removed => &self.removed,
        }
    }

    /// Returns the slot for `kind` mutably.
    pub fn get_mut(&mut self, kind: UpdateKind) -> &mut T {
        match kind {
            UpdateKind::Added => &mut self.added,
            UpdateKind::Updated => &mut self.updated,
            UpdateKind::Removed => &mut self.removed,
        }
    }

    /// Iterates `(kind, slot)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (UpdateKind, &T)> {
        UpdateKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Iterates the slots mutably in declaration order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        [&mut self.added, &mut self.updated, &mut self.removed].into_iter()
    }
}
