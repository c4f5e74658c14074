use std::{cmp::Ordering, mem, ptr::NonNull};

use log::trace;

use crate::{
    ComingFrom, Link, Node, NodePtr, NodePtrExt, Root,
    alloc::{leak_alloc_node, own_back},
};

impl<T> Default for Root<T> {
    fn default() -> Self {
        Root::new()
    }
}

// Public
impl<T> Root<T> {
    pub const fn new() -> Self {
        Root { root: None }
    }

    #[inline(always)]
    pub fn root(&self) -> NodePtr<T> {
        self.root
    }

    pub fn first(&self) -> NodePtr<T> {
        self.root.map(Node::leftmost)
    }

    /// In-order walk over the stored elements, driven by parent links.
    pub fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        std::iter::successors(self.first(), |node| unsafe { node.as_ref() }.next())
            .map(|node| &unsafe { node.as_ref() }.element)
    }

    /// Walks down from the root. `cmp` tells how the probe compares to the
    /// element it is handed: `Less` goes left, `Greater` goes right.
    pub fn locate_by<F>(&self, mut cmp: F) -> Link<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut link = Link {
            node: self.root,
            parent: None,
            from: ComingFrom::Left,
        };
        while let Some(candidate) = link.node {
            let candidate_ref = unsafe { candidate.as_ref() };
            let (node, from) = match cmp(&candidate_ref.element) {
                Ordering::Equal => break,
                Ordering::Less => (candidate_ref.left, ComingFrom::Left),
                Ordering::Greater => (candidate_ref.right, ComingFrom::Right),
            };
            link = Link {
                node,
                parent: Some(candidate),
                from,
            };
        }
        link
    }

    /// Allocates a node for `element` in the empty slot described by `link`
    /// and rebalances up to the root.
    pub fn attach(&mut self, link: &Link<T>, element: T) -> NonNull<Node<T>> {
        debug_assert!(link.node.is_none(), "attaching into an occupied slot");
        // SAFETY: the node is owned by the tree from here on and released by
        // `erase` or `clear`.
        let node = unsafe { leak_alloc_node(element, link.parent) };
        self.set_slot(link.parent, link.from, Some(node));
        self.rebalance(Some(node));
        node
    }

    /// Unlinks `node` from the tree, frees it and returns its element.
    ///
    /// A node with two children trades elements with its in-order successor,
    /// whose node (at most one child) is the one actually unlinked.
    pub fn erase(&mut self, mut node: NonNull<Node<T>>) -> T {
        let node_ref = unsafe { node.as_mut() };
        let victim = match (node_ref.left, node_ref.right) {
            (Some(_), Some(right)) => {
                let mut successor = Node::leftmost(right);
                mem::swap(
                    &mut node_ref.element,
                    &mut unsafe { successor.as_mut() }.element,
                );
                successor
            }
            _ => node,
        };
        self.unlink(victim);
        // SAFETY: victim is no longer reachable from the tree.
        let victim = *unsafe { own_back(victim) };
        victim.element
    }

    /// Frees every node without recursing: go down to a leaf, detach it from
    /// its parent, free it and climb back up.
    ///
    /// Returns how many nodes were released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        let mut current = self.root.take();
        while let Some(node) = current {
            let node_ref = unsafe { node.as_ref() };
            if let Some(child) = node_ref.left.or(node_ref.right) {
                current = Some(child);
                continue;
            }
            debug_assert!(node_ref.is_leaf());
            let mut parent = node_ref.parent;
            match node_ref.coming_from() {
                Some(ComingFrom::Left) => parent.set_left(None),
                Some(ComingFrom::Right) => parent.set_right(None),
                None => {}
            }
            // SAFETY: the leaf was just detached from its parent.
            drop(unsafe { own_back(node) });
            released += 1;
            current = parent;
        }
        released
    }

    /// Copies shape, cached heights and elements with an explicit work stack.
    pub fn clone_structure(&self) -> Root<T>
    where
        T: Clone,
    {
        // Frees the nodes copied so far if `T::clone` panics.
        struct Partial<T>(Root<T>);
        impl<T> Drop for Partial<T> {
            fn drop(&mut self) {
                self.0.clear();
            }
        }

        let mut cloned = Partial(Root::new());
        let mut pending: Vec<(NonNull<Node<T>>, NodePtr<T>, ComingFrom)> = Vec::new();
        if let Some(root) = self.root {
            pending.push((root, None, ComingFrom::Left));
        }
        while let Some((source, parent, from)) = pending.pop() {
            let source = unsafe { source.as_ref() };
            // SAFETY: owned by `cloned` once it is linked below.
            let mut copy = unsafe { leak_alloc_node(source.element.clone(), parent) };
            unsafe { copy.as_mut() }.height = source.height;
            cloned.0.set_slot(parent, from, Some(copy));
            if let Some(right) = source.right {
                pending.push((right, Some(copy), ComingFrom::Right));
            }
            if let Some(left) = source.left {
                pending.push((left, Some(copy), ComingFrom::Left));
            }
        }
        mem::take(&mut cloned.0)
    }
}

// Private
impl<T> Root<T> {
    /// Walks from `node` up to the root, refreshing cached heights and
    /// rotating wherever a balance factor reached two.
    fn rebalance(&mut self, mut node: NodePtr<T>) {
        while node.is_some() {
            node.update_height();
            let balance = node.balance_factor();
            if balance > 1 {
                if node.left().balance_factor() < 0 {
                    /*
                     * Left-right: turn it into left-left first.
                     *
                     *      n             n
                     *     /             /
                     *    l     -->     lr
                     *     \           /
                     *      lr        l
                     */
                    self.rotate_left(node.left());
                }
                node = self.rotate_right(node);
            } else if balance < -1 {
                if node.right().balance_factor() > 0 {
                    /* Right-left: turn it into right-right first. */
                    self.rotate_right(node.right());
                }
                node = self.rotate_left(node);
            }
            node = node.parent();
        }
    }

    /// Detaches `node`, which has at most one child, splicing that child into
    /// its slot, then rebalances from the former parent. Does not free.
    fn unlink(&mut self, node: NonNull<Node<T>>) {
        let node_ref = unsafe { node.as_ref() };
        debug_assert!(node_ref.left.is_none() || node_ref.right.is_none());
        let mut child = node_ref.left.or(node_ref.right);
        let parent = node_ref.parent;
        self.change_child(Some(node), child, parent);
        child.set_parent(parent);
        trace!(
            "unlinked a node with {} child",
            if child.is_some() { "one" } else { "no" }
        );
        self.rebalance(parent);
    }

    /*
     * Left rotation at x; returns y, the new subtree root.
     *
     *     x                y
     *    / \              / \
     *   a   y     -->    x   c
     *      / \          / \
     *     b   c        a   b
     */
    fn rotate_left(&mut self, mut x: NodePtr<T>) -> NodePtr<T> {
        let mut y = x.right();
        debug_assert!(y.is_some(), "left rotation without a right child");
        let mut b = y.left();
        let parent = x.parent();

        x.set_right(b);
        b.set_parent(x);
        y.set_left(x);
        y.set_parent(parent);
        x.set_parent(y);
        self.change_child(x, y, parent);

        x.update_height();
        y.update_height();
        trace!("rotated left{}", if parent.is_none() { " at the root" } else { "" });
        y
    }

    /*
     * Right rotation at y; returns x, the new subtree root.
     *
     *       y            x
     *      / \          / \
     *     x   c  -->   a   y
     *    / \              / \
     *   a   b            b   c
     */
    fn rotate_right(&mut self, mut y: NodePtr<T>) -> NodePtr<T> {
        let mut x = y.left();
        debug_assert!(x.is_some(), "right rotation without a left child");
        let mut b = x.right();
        let parent = y.parent();

        y.set_left(b);
        b.set_parent(y);
        x.set_right(y);
        x.set_parent(parent);
        y.set_parent(x);
        self.change_child(y, x, parent);

        y.update_height();
        x.update_height();
        trace!("rotated right{}", if parent.is_none() { " at the root" } else { "" });
        x
    }

    /// Rewrites the slot of `parent` holding `old` (or the root) to `new`.
    fn change_child(&mut self, old: NodePtr<T>, new: NodePtr<T>, parent: NodePtr<T>) {
        if let Some(mut parent) = parent {
            let parent = unsafe { parent.as_mut() };
            if parent.left == old {
                parent.left = new;
            } else {
                parent.right = new;
            }
        } else {
            self.root = new;
        }
    }

    fn set_slot(&mut self, mut parent: NodePtr<T>, from: ComingFrom, new: NodePtr<T>) {
        match (parent.is_some(), from) {
            (false, _) => self.root = new,
            (true, ComingFrom::Left) => parent.set_left(new),
            (true, ComingFrom::Right) => parent.set_right(new),
        }
    }
}
