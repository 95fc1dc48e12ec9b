//! Backing-store shapes a container can wrap.
//!
//! Containers are generic over their store so the owner decides the
//! representation: a plain `Vec`, a `VecDeque`, a persistent `im` structure
//! shared with snapshots, or whichever map fits. The traits cover exactly the
//! operations the containers need.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

/// An index-addressed sequence.
pub trait Sequence<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Element at `index`, if in bounds.
    fn get(&self, index: usize) -> Option<&T>;

    /// Replaces the element at `index`, returning the old one.
    /// Returns `None` (and drops `value`) if `index` is out of bounds.
    fn replace(&mut self, index: usize, value: T) -> Option<T>;

    /// Appends an element.
    fn push(&mut self, value: T);

    /// Removes and returns the element at `index`, shifting later elements down.
    fn remove(&mut self, index: usize) -> Option<T>;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first element matching `predicate`.
    fn position(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        (0..self.len()).find(|&index| self.get(index).is_some_and(&mut predicate))
    }
}

impl<T> Sequence<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn replace(&mut self, index: usize, value: T) -> Option<T> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value))
    }

    fn push(&mut self, value: T) {
        Vec::push(self, value);
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        (index < Vec::len(self)).then(|| Vec::remove(self, index))
    }

    fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().position(predicate)
    }
}

impl<T> Sequence<T> for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }

    fn replace(&mut self, index: usize, value: T) -> Option<T> {
        VecDeque::get_mut(self, index).map(|slot| std::mem::replace(slot, value))
    }

    fn push(&mut self, value: T) {
        self.push_back(value);
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        VecDeque::remove(self, index)
    }

    fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().position(predicate)
    }
}

impl<T: Clone> Sequence<T> for im::Vector<T> {
    fn len(&self) -> usize {
        im::Vector::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        im::Vector::get(self, index)
    }

    fn replace(&mut self, index: usize, value: T) -> Option<T> {
        im::Vector::get_mut(self, index).map(|slot| std::mem::replace(slot, value))
    }

    fn push(&mut self, value: T) {
        self.push_back(value);
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        (index < im::Vector::len(self)).then(|| im::Vector::remove(self, index))
    }

    fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().position(predicate)
    }
}

/// A key-addressed map.
pub trait KeyedStore<K, V> {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Value for `key`.
    fn get(&self, key: &K) -> Option<&V>;

    /// Inserts or replaces, returning the previous value.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key`, returning its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Snapshot of the keys in the store's own iteration order.
    fn keys(&self) -> Vec<K>;

    /// Returns true if `key` has a value.
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V, S: BuildHasher> KeyedStore<K, V> for HashMap<K, V, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn keys(&self) -> Vec<K> {
        HashMap::keys(self).cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }
}

impl<K: Ord + Clone, V> KeyedStore<K, V> for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BTreeMap::remove(self, key)
    }

    fn keys(&self) -> Vec<K> {
        BTreeMap::keys(self).cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        BTreeMap::contains_key(self, key)
    }
}

impl<K, V, S> KeyedStore<K, V> for im::HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        im::HashMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        im::HashMap::get(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        im::HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        im::HashMap::remove(self, key)
    }

    fn keys(&self) -> Vec<K> {
        im::HashMap::keys(self).cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        im::HashMap::contains_key(self, key)
    }
}

impl<K: Ord + Clone, V: Clone> KeyedStore<K, V> for im::OrdMap<K, V> {
    fn len(&self) -> usize {
        im::OrdMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        im::OrdMap::get(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        im::OrdMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        im::OrdMap::remove(self, key)
    }

    fn keys(&self) -> Vec<K> {
        im::OrdMap::keys(self).cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        im::OrdMap::contains_key(self, key)
    }
}
