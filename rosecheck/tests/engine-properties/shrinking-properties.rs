//! Shrinking correctness properties
//!
//! Every shrink must be smaller by its generator's ordering, and every
//! shrink path must be finite.

use crate::seeds;
use rosecheck::*;

pub fn test_integer_shrinks_move_toward_zero() {
    let gen = Gen::<i64>::choose(-500, 500);
    for seed in seeds(25) {
        let tree = gen.generate(Size::new(10), seed).unwrap();
        let root = *tree.root();
        for child in tree.children().iter() {
            assert!(child.root().abs() <= root.abs());
            for grandchild in child.children().iter() {
                assert!(grandchild.root().abs() <= child.root().abs());
            }
        }
    }
    println!("✓ Integer shrinks move toward zero");
}

pub fn test_vector_shrinks_never_grow() {
    let gen = Gen::<Vec<i64>>::vec_of(Gen::<i64>::choose(0, 50));
    for seed in seeds(25) {
        let tree = gen.generate(Size::new(10), seed).unwrap();
        let root_len = tree.root().len();
        for child in tree.children().iter() {
            assert!(child.root().len() <= root_len);
            for grandchild in child.children().iter() {
                assert!(grandchild.root().len() <= child.root().len());
            }
        }
    }
    println!("✓ Vector shrinks never grow");
}

/// Walk the first-child spine to a leaf; finite shrink paths are the
/// termination guarantee the shrink search relies on.
fn spine_length<T: Clone + 'static>(tree: &Tree<T>) -> usize {
    let mut current = tree.clone();
    let mut steps = 0;
    loop {
        let children = current.children();
        match children.first() {
            None => return steps,
            Some(next) => {
                current = next.clone();
                steps += 1;
                assert!(steps < 10_000, "shrink path failed to terminate");
            }
        }
    }
}

pub fn test_shrink_paths_terminate() {
    for seed in seeds(10) {
        let int_tree = Gen::<i64>::choose(-1000, 1000)
            .generate(Size::new(10), seed)
            .unwrap();
        spine_length(&int_tree);

        let vec_tree = Gen::<Vec<i64>>::vec_of(Gen::<i64>::integer())
            .generate(Size::new(12), seed)
            .unwrap();
        spine_length(&vec_tree);

        let string_tree = Gen::<String>::string_ascii()
            .generate(Size::new(12), seed)
            .unwrap();
        spine_length(&string_tree);
    }
    println!("✓ Shrink paths terminate");
}

pub fn test_filtered_shrinks_respect_the_predicate() {
    let gen = Gen::<i64>::choose(0, 200).such_that_with(50, |n| n % 3 == 0);
    for seed in seeds(25) {
        let tree = gen.generate(Size::new(10), seed).unwrap();
        assert_eq!(tree.root() % 3, 0);
        for child in tree.children().iter() {
            assert_eq!(child.root() % 3, 0);
            for grandchild in child.children().iter() {
                assert_eq!(grandchild.root() % 3, 0);
            }
        }
    }
    println!("✓ Filtered shrinks respect the predicate");
}
