use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::{self, Debug},
    marker::PhantomData,
    mem,
};

use log::{debug, trace};

use crate::{AvlError, AvlTree, DuplicatePolicy, Link, NodePtrExt, Result, Root};

impl<T> Drop for AvlTree<T> {
    fn drop(&mut self) {
        // don't log from drop; clear() is the observable teardown.
        self.root.clear();
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for AvlTree<T> {
    fn clone(&self) -> Self {
        debug!("cloning a tree of {} elements", self.len);
        AvlTree {
            root: self.root.clone_structure(),
            len: self.len,
            policy: self.policy,
            marker: PhantomData,
        }
    }
}

impl<T: Debug> Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.root.elements()).finish()
    }
}

impl<T> AvlTree<T> {
    /// Makes an empty tree that rejects duplicate elements.
    pub const fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Reject)
    }

    pub const fn with_policy(policy: DuplicatePolicy) -> Self {
        AvlTree {
            root: Root::new(),
            len: 0,
            policy,
            marker: PhantomData,
        }
    }

    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    /// Same as [`Self::len`].
    pub const fn size(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels: 0 when empty, 1 for a single element.
    ///
    /// Read from the root's cached height, so it is `O(1)`.
    pub fn height(&self) -> usize {
        (self.root.root().height() + 1) as usize
    }

    /// Drops every element. The tree stays usable.
    pub fn clear(&mut self) {
        let released = self.root.clear();
        debug_assert_eq!(released, self.len);
        debug!("cleared {released} elements");
        self.len = 0;
    }

    pub(crate) fn find_by<F>(&self, cmp: F) -> Result<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let node = self.root.locate_by(cmp).node.ok_or(AvlError::NotFound)?;
        Ok(&unsafe { node.as_ref() }.element)
    }

    /// The caller must not change how the element orders.
    pub(crate) fn find_mut_by<F>(&mut self, cmp: F) -> Result<&mut T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut node = self.root.locate_by(cmp).node.ok_or(AvlError::NotFound)?;
        Ok(&mut unsafe { node.as_mut() }.element)
    }

    pub(crate) fn remove_by<F>(&mut self, cmp: F) -> Result<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let node = self.root.locate_by(cmp).node.ok_or(AvlError::NotFound)?;
        let element = self.root.erase(node);
        self.len -= 1;
        trace!("removed an element, {} left", self.len);
        Ok(element)
    }
}

impl<T: Ord> AvlTree<T> {
    /// Returns the stored element equal to `probe`.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibre::{AvlError, AvlTree};
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(String::from("b")).unwrap();
    /// assert_eq!(tree.find("b").map(String::as_str), Ok("b"));
    /// assert_eq!(tree.find("a"), Err(AvlError::NotFound));
    /// ```
    pub fn find<Q>(&self, probe: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_by(|element| probe.cmp(element.borrow()))
    }

    pub fn contains<Q>(&self, probe: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(probe).is_ok()
    }

    /// Inserts `element`, rebalancing on the way back to the root.
    ///
    /// If an equal element is already stored, the tree's [`DuplicatePolicy`]
    /// decides: `Reject` fails with [`AvlError::DuplicateKey`], `Replace`
    /// stores `element` and returns the previous one.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibre::{AvlError, AvlTree, DuplicatePolicy};
    ///
    /// let mut strict = AvlTree::new();
    /// assert_eq!(strict.insert(1), Ok(None));
    /// assert_eq!(strict.insert(1), Err(AvlError::DuplicateKey));
    ///
    /// let mut lenient = AvlTree::with_policy(DuplicatePolicy::Replace);
    /// assert_eq!(lenient.insert(1), Ok(None));
    /// assert_eq!(lenient.insert(1), Ok(Some(1)));
    /// assert_eq!(lenient.len(), 1);
    /// ```
    pub fn insert(&mut self, element: T) -> Result<Option<T>> {
        let link = self.root.locate_by(|other| element.cmp(other));
        if link.node.is_some() && self.policy == DuplicatePolicy::Reject {
            return Err(AvlError::DuplicateKey);
        }
        Ok(self.settle(link, element))
    }

    /// Inserts `element`, or swaps it with the equal one already stored,
    /// whatever the policy.
    pub(crate) fn upsert(&mut self, element: T) -> Option<T> {
        let link = self.root.locate_by(|other| element.cmp(other));
        self.settle(link, element)
    }

    fn settle(&mut self, link: Link<T>, element: T) -> Option<T> {
        if let Some(mut node) = link.node {
            trace!("replaced an element in place");
            return Some(mem::replace(&mut unsafe { node.as_mut() }.element, element));
        }
        self.root.attach(&link, element);
        self.len += 1;
        trace!("inserted an element, {} stored", self.len);
        None
    }

    /// Removes and returns the element equal to `probe`.
    pub fn remove<Q>(&mut self, probe: &Q) -> Result<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_by(|element| probe.cmp(element.borrow()))
    }
}
