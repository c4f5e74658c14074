use std::ptr::NonNull;

use crate::Node;

/// Boxes `element` in a fresh leaf node and leaks it.
///
/// # Safety
///
/// It leaks; use with [`own_back`].
pub(crate) unsafe fn leak_alloc_node<T>(element: T, parent: Option<NonNull<Node<T>>>) -> NonNull<Node<T>> {
    let mut node = Node::new(element);
    node.parent = parent;
    NonNull::from(Box::leak(Box::new(node)))
}

/// # Safety
///
/// It drops; use after [`leak_alloc_node`], exactly once per node, and only
/// once nothing links to `current` anymore.
pub(crate) unsafe fn own_back<T>(current: NonNull<Node<T>>) -> Box<Node<T>> {
    unsafe { Box::from_raw(current.as_ptr()) }
}
