//! Immutable keyed configuration tables.

use std::fmt;
use std::hash::Hash;

use watchtable_containers::{IdList, ObservableDictionary};
use watchtable_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Serialize, de::DeserializeOwned};
#[cfg(feature = "serde")]
use watchtable_foundation::ErrorKind;

/// A configuration row that knows its own key.
pub trait ConfigRow: Clone + 'static {
    /// The row's identity within its table.
    type Key: Ord + Hash + Clone + fmt::Debug + 'static;

    /// Returns this row's key.
    fn key(&self) -> Self::Key;
}

/// An immutable, keyed collection of rows of one type.
///
/// Cloning is O(1); the rows are held in a persistent map.
pub struct ConfigTable<R: ConfigRow> {
    rows: im::OrdMap<R::Key, R>,
}

impl<R: ConfigRow> Clone for ConfigTable<R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<R: ConfigRow> Default for ConfigTable<R> {
    fn default() -> Self {
        Self {
            rows: im::OrdMap::new(),
        }
    }
}

impl<R: ConfigRow + fmt::Debug> fmt::Debug for ConfigTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.values()).finish()
    }
}

impl<R: ConfigRow> ConfigTable<R> {
    /// Builds a table from `rows`.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` if two rows share a key.
    pub fn from_rows(rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut map = im::OrdMap::new();
        for row in rows {
            let key = row.key();
            if map.contains_key(&key) {
                return Err(Error::duplicate_key(&key).during("ConfigTable", "from_rows"));
            }
            map.insert(key, row);
        }
        Ok(Self { rows: map })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row for `key`, if present.
    #[must_use]
    pub fn try_get(&self, key: &R::Key) -> Option<&R> {
        self.rows.get(key)
    }

    /// The row for `key`.
    ///
    /// # Errors
    ///
    /// Fails with `KeyNotFound` if absent.
    pub fn get(&self, key: &R::Key) -> Result<&R> {
        self.rows
            .get(key)
            .ok_or_else(|| Error::key_not_found(key).during("ConfigTable", "get"))
    }

    /// Rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.rows.keys()
    }

    /// A fresh [`IdList`] owning a copy of the rows, in key order.
    #[must_use]
    pub fn to_id_list(&self) -> IdList<R::Key, R> {
        IdList::from_store(R::key, self.iter().cloned().collect())
    }

    /// A fresh [`ObservableDictionary`] owning a copy of the rows.
    #[must_use]
    pub fn to_dictionary(&self) -> ObservableDictionary<R::Key, R> {
        ObservableDictionary::from_store(
            self.rows
                .iter()
                .map(|(key, row)| (key.clone(), row.clone()))
                .collect(),
        )
    }
}

#[cfg(feature = "serde")]
impl<R: ConfigRow + DeserializeOwned> ConfigTable<R> {
    /// Decodes a MessagePack array of rows.
    ///
    /// # Errors
    ///
    /// Fails with `Decode` on malformed input, or `DuplicateKey` as
    /// [`ConfigTable::from_rows`].
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        let rows: Vec<R> = rmp_serde::from_slice(bytes)
            .map_err(|e| Error::new(ErrorKind::Decode(e.to_string())))?;
        Self::from_rows(rows)
    }
}

#[cfg(feature = "serde")]
impl<R: ConfigRow + Serialize> ConfigTable<R> {
    /// Encodes the rows, in key order, as a MessagePack array.
    ///
    /// # Errors
    ///
    /// Fails if a row cannot be serialized.
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        let rows: Vec<&R> = self.iter().collect();
        rmp_serde::to_vec(&rows).map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))
    }
}
