//! An AVL tree whose nodes keep a link to their parent and a cached height.
//!
//! [`AvlTree`] stores totally ordered elements; [`AvlMap`] pairs keys with
//! values on top of it.
//!
//! ```
//! use equilibre::{AvlError, AvlMap};
//!
//! let mut map = AvlMap::new();
//! map.put(3, "three");
//! map.put(1, "one");
//! assert_eq!(map.find(&3), Ok(&"three"));
//! assert_eq!(map.erase(&1), Ok("one"));
//! assert_eq!(map.find(&1), Err(AvlError::NotFound));
//! assert_eq!(map.size(), 1);
//! ```
mod alloc;
#[cfg(test)]
mod check;
mod error;
mod map;
mod node;
mod root;
mod tree;

use std::{marker::PhantomData, ptr::NonNull};

pub use error::{AvlError, Result};

pub(crate) type NodePtr<T> = Option<NonNull<Node<T>>>;

/// Which side of its parent a slot hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComingFrom {
    Left,
    Right,
}

pub(crate) trait NodePtrExt {
    type Element;

    fn balance_factor(&self) -> i32;
    fn height(&self) -> i32;
    fn left(&self) -> NodePtr<Self::Element>;
    fn parent(&self) -> NodePtr<Self::Element>;
    fn right(&self) -> NodePtr<Self::Element>;
    fn set_left(&mut self, left: NodePtr<Self::Element>);
    fn set_parent(&mut self, parent: NodePtr<Self::Element>);
    fn set_right(&mut self, right: NodePtr<Self::Element>);
    fn update_height(&mut self);
}

impl<T> NodePtrExt for NodePtr<T> {
    type Element = T;

    #[inline(always)]
    fn balance_factor(&self) -> i32 {
        self.map_or(0, |v| unsafe { v.as_ref() }.balance_factor())
    }

    /// An absent subtree has height -1.
    #[inline(always)]
    fn height(&self) -> i32 {
        self.map_or(-1, |v| unsafe { v.as_ref() }.height)
    }

    #[inline(always)]
    fn left(&self) -> NodePtr<Self::Element> {
        self.and_then(|v| unsafe { v.as_ref() }.left)
    }

    #[inline(always)]
    fn parent(&self) -> NodePtr<Self::Element> {
        self.and_then(|v| unsafe { v.as_ref() }.parent)
    }

    #[inline(always)]
    fn right(&self) -> NodePtr<Self::Element> {
        self.and_then(|v| unsafe { v.as_ref() }.right)
    }

    #[inline(always)]
    fn set_left(&mut self, left: NodePtr<Self::Element>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.left = left;
        }
    }

    #[inline(always)]
    fn set_parent(&mut self, parent: NodePtr<Self::Element>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.parent = parent;
        }
    }

    #[inline(always)]
    fn set_right(&mut self, right: NodePtr<Self::Element>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.right = right;
        }
    }

    #[inline(always)]
    fn update_height(&mut self) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.update_height();
        }
    }
}

pub(crate) struct Node<T> {
    pub(crate) parent: NodePtr<T>,
    pub(crate) left: NodePtr<T>,
    pub(crate) right: NodePtr<T>,
    // Height of the subtree rooted here; a leaf is 0.
    pub(crate) height: i32,
    pub(crate) element: T,
}

/// The result of walking down from the root towards a probe.
///
/// `node` is what currently occupies the slot (absent if the probe is not in
/// the tree); the slot itself is `parent`'s `from` child, or the root when
/// `parent` is absent.
pub(crate) struct Link<T> {
    pub(crate) node: NodePtr<T>,
    pub(crate) parent: NodePtr<T>,
    pub(crate) from: ComingFrom,
}

/// Holds the root link and the structural primitives working on it.
pub(crate) struct Root<T> {
    root: NodePtr<T>,
}

/// What [`AvlTree::insert`] does when an equal element is already stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`AvlError::DuplicateKey`] and leave the tree untouched.
    #[default]
    Reject,
    /// Swap the new element in and hand back the previous one.
    Replace,
}

/// A height-balanced binary search tree.
///
/// Every operation keyed by an element is `O(log n)`. Elements are compared
/// with [`Ord`]; the tree never holds two equal elements.
pub struct AvlTree<T> {
    root: Root<T>,
    len: usize,
    policy: DuplicatePolicy,
    marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: the tree exclusively owns its nodes; the raw links never escape
// and are only followed through `&self`/`&mut self`.
unsafe impl<T: Send> Send for AvlTree<T> {}
// SAFETY: shared access only ever hands out `&T`.
unsafe impl<T: Sync> Sync for AvlTree<T> {}

/// A map from keys to values backed by an [`AvlTree`].
pub struct AvlMap<K, V> {
    tree: AvlTree<map::Entry<K, V>>,
}
