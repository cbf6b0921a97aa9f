//! Determinism properties
//!
//! The same size and seed must reproduce the same tree, and a run
//! replayed with its recorded seed must reproduce the same report.

use crate::seeds;
use rosecheck::*;

fn assert_same_tree<T>(gen: &Gen<T>, size: usize, seed: Seed)
where
    T: PartialEq + std::fmt::Debug + Clone + 'static,
{
    let first = gen.generate(Size::new(size), seed).unwrap();
    let second = gen.generate(Size::new(size), seed).unwrap();
    assert_eq!(first.root(), second.root());

    let first_children: Vec<T> = first.children().iter().map(|c| c.root().clone()).collect();
    let second_children: Vec<T> = second.children().iter().map(|c| c.root().clone()).collect();
    assert_eq!(first_children, second_children);
}

pub fn test_generator_battery_is_deterministic() {
    for seed in seeds(10) {
        assert_same_tree(&Gen::<i64>::integer(), 20, seed);
        assert_same_tree(&Gen::<i64>::large_integer(), 20, seed);
        assert_same_tree(&Gen::<Vec<i64>>::vec_of(Gen::<i64>::choose(-9, 9)), 8, seed);
        assert_same_tree(&Gen::<String>::string_alphanumeric(), 8, seed);
        assert_same_tree(
            &Gen::<(i64, bool)>::tuple_of(Gen::<i64>::natural(), Gen::<bool>::bool()),
            10,
            seed,
        );
        assert_same_tree(
            &Gen::<Vec<i64>>::vec_distinct(Gen::<i64>::choose(0, 10_000), CollectionOpts::default()),
            6,
            seed,
        );
        assert_same_tree(&Gen::<Symbol>::symbol(), 25, seed);
    }
    println!("✓ Generator battery is deterministic");
}

pub fn test_quick_check_replays_exactly() {
    let property = || {
        for_all(Gen::<Vec<i64>>::vec_of(Gen::<i64>::integer()), |v| {
            v.iter().sum::<i64>() < 50
        })
    };
    let config = Config::default().with_seed(20220825).with_max_size(80);

    let first = quick_check(150, &property(), &config).unwrap();
    let second = quick_check(150, &property(), &config).unwrap();
    assert_eq!(first, second, "replay must be byte-identical");
    println!("✓ quick_check replays exactly");
}
