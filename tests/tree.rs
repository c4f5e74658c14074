use std::collections::BTreeSet;

use equilibre::{AvlError, AvlMap, AvlTree};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

// Worst case levels of an AVL tree holding n elements.
fn avl_bound(n: usize) -> f64 {
    1.4405 * ((n + 2) as f64).log2() - 0.3277
}

fn shuffled(n: usize, seed: u64) -> Vec<u32> {
    let mut keys: Vec<u32> = (0..n as u32).collect();
    keys.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    keys
}

#[test]
fn height_stays_within_the_avl_bound() {
    for n in [1, 10, 100, 10_000] {
        for seed in 0..4 {
            let mut tree = AvlTree::new();
            for key in shuffled(n, seed) {
                assert_eq!(Ok(None), tree.insert(key));
            }
            assert_eq!(n, tree.len());
            assert!(
                tree.height() as f64 <= avl_bound(n),
                "n = {n}, seed = {seed}: height {} over {:.2}",
                tree.height(),
                avl_bound(n)
            );
        }
    }
}

#[test]
fn height_bound_holds_while_shrinking() {
    let mut tree = AvlTree::new();
    let keys = shuffled(10_000, 7);
    for &key in &keys {
        tree.insert(key).unwrap();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut order = keys.clone();
    order.shuffle(&mut rng);
    for (removed, key) in order.iter().enumerate() {
        assert_eq!(Ok(*key), tree.remove(key));
        let left = keys.len() - removed - 1;
        assert!(tree.height() as f64 <= avl_bound(left));
    }
    assert_eq!(true, tree.is_empty());
}

#[test]
fn map_round_trip() {
    let mut map = AvlMap::new();
    let keys = shuffled(1_000, 3);
    for &key in &keys {
        assert_eq!(None, map.put(key, format!("v{key}")));
    }
    for &key in &keys {
        assert_eq!(Ok(&format!("v{key}")), map.find(&key));
    }
    for &key in keys.iter().filter(|key| *key % 3 == 0) {
        assert_eq!(Ok(format!("v{key}")), map.erase(&key));
        assert_eq!(Err(AvlError::NotFound), map.find(&key));
    }
    assert_eq!(keys.len() - keys.len().div_ceil(3), map.size());
}

#[test]
fn random_mix_agrees_with_btreeset() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut tree = AvlTree::new();
    let mut model = BTreeSet::new();
    for _ in 0..20_000 {
        let key: u16 = rng.random_range(0..512);
        if rng.random_bool(0.6) {
            let fresh = model.insert(key);
            let expected = if fresh { Ok(None) } else { Err(AvlError::DuplicateKey) };
            assert_eq!(expected, tree.insert(key));
        } else {
            let expected = if model.remove(&key) { Ok(key) } else { Err(AvlError::NotFound) };
            assert_eq!(expected, tree.remove(&key));
        }
        assert_eq!(model.len(), tree.len());
    }
    for key in 0..512u16 {
        assert_eq!(model.contains(&key), tree.contains(&key));
    }
    assert!(tree.height() as f64 <= avl_bound(tree.len()));
}

#[test]
fn tree_moves_across_threads() {
    let mut tree = AvlTree::new();
    for key in 0..100u32 {
        tree.insert(key).unwrap();
    }
    let tree = std::thread::spawn(move || {
        tree.remove(&50).unwrap();
        tree
    })
    .join()
    .unwrap();
    assert_eq!(99, tree.len());
    assert_eq!(Err(AvlError::NotFound), tree.find(&50));
}
