use std::fmt::Debug;

use crate::{AvlTree, NodePtrExt};

/// Panics unless `tree` is ordered, balanced, has consistent parent links,
/// accurate cached heights and the right count. Does not recurse.
pub(crate) fn check_invariants<T: Ord + Debug>(tree: &AvlTree<T>) {
    let root = tree.root.root();
    assert_eq!(None, root.parent(), "the root has a parent");

    let mut reachable = 0;
    let mut pending = Vec::from_iter(root);
    while let Some(node) = pending.pop() {
        let node_ref = unsafe { node.as_ref() };
        reachable += 1;
        for child in [node_ref.left, node_ref.right].into_iter().flatten() {
            assert_eq!(
                Some(node),
                Some(child).parent(),
                "child of {:?} links to another parent",
                node_ref
            );
            pending.push(child);
        }
        assert_eq!(
            1 + node_ref.left.height().max(node_ref.right.height()),
            node_ref.height,
            "stale height at {:?}",
            node_ref
        );
        assert!(
            node_ref.balance_factor().abs() <= 1,
            "unbalanced at {:?}",
            node_ref
        );
    }
    assert_eq!(tree.len, reachable, "count mismatch");

    let elements: Vec<&T> = tree.root.elements().collect();
    assert_eq!(reachable, elements.len(), "in-order walk missed nodes");
    assert!(
        elements.windows(2).all(|pair| pair[0] < pair[1]),
        "out of order: {elements:?}"
    );
}
