//! Combinator laws
//!
//! The functor and monad identities at the rose-root level, plus the
//! degenerate forms of the choice combinators.

use crate::seeds;
use rosecheck::*;

pub fn test_map_identity_preserves_roots() {
    let gen = Gen::<i64>::choose(-100, 100);
    let mapped = gen.map(|n| *n);
    for seed in seeds(20) {
        let plain = gen.generate(Size::new(10), seed).unwrap();
        let identity = mapped.generate(Size::new(10), seed).unwrap();
        assert_eq!(plain.root(), identity.root());
    }
    println!("✓ map(id) preserves roots");
}

pub fn test_map_composition() {
    let gen = Gen::<i64>::choose(0, 100);
    let staged = gen.map(|n| n + 1).map(|n| n * 2);
    let fused = gen.map(|n| (n + 1) * 2);
    for seed in seeds(20) {
        let a = staged.generate(Size::new(10), seed).unwrap();
        let b = fused.generate(Size::new(10), seed).unwrap();
        assert_eq!(a.root(), b.root());
    }
    println!("✓ map composes");
}

pub fn test_bind_identities() {
    // Left identity: binding a constant runs the continuation with the
    // split-off downstream seed.
    let continuation = |n: &i64| Gen::<i64>::choose(0, *n);
    let bound = Gen::constant(9i64).bind(continuation);
    for seed in seeds(20) {
        let (_, inner_seed) = seed.split();
        let direct = continuation(&9).generate(Size::new(10), inner_seed).unwrap();
        let via_bind = bound.generate(Size::new(10), seed).unwrap();
        assert_eq!(via_bind.root(), direct.root());
    }

    // Right identity: binding into constant keeps the generated roots.
    let gen = Gen::<i64>::choose(0, 100);
    let rebound = gen.bind(|n| Gen::constant(*n));
    for seed in seeds(20) {
        let (outer_seed, _) = seed.split();
        let plain = gen.generate(Size::new(10), outer_seed).unwrap();
        let via_bind = rebound.generate(Size::new(10), seed).unwrap();
        assert_eq!(via_bind.root(), plain.root());
    }
    println!("✓ bind identities hold at roots");
}

pub fn test_degenerate_choices_are_total() {
    let lone = Gen::one_of(vec![Gen::<i64>::choose(3, 3)]);
    let weighted = Gen::frequency(vec![(5, Gen::<i64>::choose(7, 7))]);
    for seed in seeds(20) {
        assert_eq!(*lone.generate(Size::new(5), seed).unwrap().root(), 3);
        assert_eq!(*weighted.generate(Size::new(5), seed).unwrap().root(), 7);
    }
    println!("✓ Degenerate choices are total");
}

pub fn test_tuple_components_are_independent() {
    let left = Gen::<i64>::choose(0, 1000);
    let right = Gen::<i64>::choose(-1000, 0);
    let pair = Gen::<(i64, i64)>::tuple_of(left.clone(), right.clone());
    for seed in seeds(20) {
        let tuple_root = *pair.generate(Size::new(10), seed).unwrap().root();
        let (s1, s2) = seed.split();
        let left_root = *left.generate(Size::new(10), s1).unwrap().root();
        let right_root = *right.generate(Size::new(10), s2).unwrap().root();
        assert_eq!(tuple_root, (left_root, right_root));
    }
    println!("✓ Tuple components generate independently");
}
