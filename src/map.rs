use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::{self, Debug},
    ops::Index,
};

use crate::{AvlMap, AvlTree, DuplicatePolicy, Result};

/// A key and its value, ordered by key alone.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K: Ord, V> Ord for Entry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K: Ord, V> PartialOrd for Entry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for Entry<K, V> {}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for AvlMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: Debug, V: Debug> Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.tree.root.elements().map(|entry| (&entry.key, &entry.value)))
            .finish()
    }
}

impl<K, V> AvlMap<K, V> {
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::with_policy(DuplicatePolicy::Replace),
        }
    }

    /// Number of pairs in the map.
    pub const fn size(&self) -> usize {
        self.tree.len()
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Associates `value` with `key`, returning the value it replaces.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.tree
            .upsert(Entry { key, value })
            .map(|previous| previous.value)
    }

    /// Returns the value stored under `key`, or [`crate::AvlError::NotFound`].
    pub fn find<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree
            .find_by(|entry| key.cmp(entry.key.borrow()))
            .map(|entry| &entry.value)
    }

    /// Like [`Self::find`], but lets the value be changed in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibre::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.put("hits", 0);
    /// *map.find_mut("hits").unwrap() += 1;
    /// assert_eq!(map["hits"], 1);
    /// ```
    pub fn find_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree
            .find_mut_by(|entry| key.cmp(entry.key.borrow()))
            .map(|entry| &mut entry.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_ok()
    }

    /// Removes `key` and returns its value.
    pub fn erase<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree
            .remove_by(|entry| key.cmp(entry.key.borrow()))
            .map(|entry| entry.value)
    }
}

impl<K, Q: ?Sized, V> Index<&Q> for AvlMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `AvlMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.find(key).expect("no entry found for key")
    }
}
