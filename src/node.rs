use std::{fmt::Debug, ptr::NonNull};

use super::{ComingFrom, Node, NodePtr, NodePtrExt};

impl<T> Node<T> {
    pub fn new(element: T) -> Self {
        Node {
            parent: None,
            left: None,
            right: None,
            height: 0,
            element,
        }
    }

    #[inline(always)]
    pub fn balance_factor(&self) -> i32 {
        self.left.height() - self.right.height()
    }

    #[inline(always)]
    pub fn update_height(&mut self) {
        self.height = 1 + self.left.height().max(self.right.height());
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The side of its parent this node hangs from, `None` for the root.
    #[inline(always)]
    pub fn coming_from(&self) -> Option<ComingFrom> {
        let parent = unsafe { self.parent?.as_ref() };
        if parent.left == Some(NonNull::from(self)) {
            Some(ComingFrom::Left)
        } else {
            Some(ComingFrom::Right)
        }
    }

    /// Smallest node of the subtree rooted at `current`.
    ///
    /// Takes the stored link rather than `&self` so the result keeps the
    /// allocation's write permission; `erase` mutates and frees it.
    #[inline(always)]
    pub fn leftmost(mut current: NonNull<Node<T>>) -> NonNull<Node<T>> {
        // SAFETY: every left link of a live node points to a live node.
        while let Some(left) = unsafe { current.as_ref() }.left {
            current = left;
        }
        current
    }

    /// In-order successor, following parent links when there is no right
    /// subtree.
    #[inline(always)]
    pub fn next(&self) -> NodePtr<T> {
        // If we have a right-hand child, go down and then left as far as we
        // can.
        if let Some(right) = self.right {
            return Some(Node::leftmost(right));
        }
        // No right-hand child: climb while we are a right-hand child, the
        // first parent we reach from its left is the successor.
        let mut node_ref = self;
        loop {
            let parent = node_ref.parent?;
            match node_ref.coming_from() {
                Some(ComingFrom::Left) => return Some(parent),
                // SAFETY: parent is live by construction.
                _ => node_ref = unsafe { parent.as_ref() },
            }
        }
    }
}

impl<T> Debug for Node<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}@{}", self.element, self.height))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alloc::{leak_alloc_node, own_back};
    use pretty_assertions::assert_eq;

    // Links a child under a parent on the given side, both directions.
    macro_rules! link {
        ($parent:expr, $child:expr, left) => {
            Some($parent).set_left(Some($child));
            Some($child).set_parent(Some($parent));
        };
        ($parent:expr, $child:expr, right) => {
            Some($parent).set_right(Some($child));
            Some($child).set_parent(Some($parent));
        };
    }

    fn node<'a>(ptr: NonNull<Node<i32>>) -> &'a Node<i32> {
        unsafe { ptr.as_ref() }
    }

    #[test]
    fn new_node_is_a_balanced_leaf() {
        let node = Node::new(7);
        assert_eq!(0, node.height);
        assert_eq!(0, node.balance_factor());
        assert_eq!(true, node.is_leaf());
        assert_eq!(None, node.coming_from());
        assert_eq!(None, node.next());
    }

    #[test]
    fn heights_and_successors() {
        //      2
        //     / \
        //    1   4
        //       /
        //      3
        let [one, two, three, four] = [1, 2, 3, 4].map(|v| unsafe { leak_alloc_node(v, None) });
        link!(two, one, left);
        link!(two, four, right);
        link!(four, three, left);
        Some(four).update_height();
        Some(two).update_height();

        assert_eq!(1, node(four).height);
        assert_eq!(2, node(two).height);
        assert_eq!(1, node(four).balance_factor());
        assert_eq!(-1, node(two).balance_factor());
        assert_eq!(Some(ComingFrom::Left), node(one).coming_from());
        assert_eq!(Some(ComingFrom::Right), node(four).coming_from());

        let succ = |ptr| node(ptr).next().map(|n| node(n).element);
        assert_eq!(Some(2), succ(one));
        assert_eq!(Some(3), succ(two));
        assert_eq!(Some(4), succ(three));
        assert_eq!(None, succ(four));
        assert_eq!(one, Node::leftmost(two));
        assert_eq!(three, Node::leftmost(four));

        for ptr in [one, two, three, four] {
            drop(unsafe { own_back(ptr) });
        }
    }
}
