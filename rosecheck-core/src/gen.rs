//! Generator core and combinators.
//!
//! A generator is a pure function from `(Size, Seed)` to a lazy rose
//! tree: the root is the generated value and the children are its
//! shrink possibilities. Generators are explicit, first-class values
//! composed with combinator functions; the same size and seed always
//! reproduce the same tree.

use std::rc::Rc;

use crate::data::{Seed, Size};
use crate::error::{Error, Result};
use crate::tree::Tree;

pub mod collection;
pub mod number;
pub mod recursive;
pub mod text;

pub use collection::*;
pub use number::*;
pub use recursive::*;
pub use text::*;

/// A generator for test data of type `T`.
pub struct Gen<T> {
    run: Rc<dyn Fn(Size, Seed) -> Result<Tree<T>>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T: Clone + 'static> Gen<T> {
    /// Create a new generator from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Size, Seed) -> Result<Tree<T>> + 'static,
    {
        Gen { run: Rc::new(f) }
    }

    /// Generate a shrink tree using the given size and seed.
    pub fn generate(&self, size: Size, seed: Seed) -> Result<Tree<T>> {
        (self.run)(size, seed)
    }

    /// A generator that always produces the same value, with no shrinks.
    pub fn constant(value: T) -> Self {
        Gen::new(move |_size, _seed| Ok(Tree::singleton(value.clone())))
    }

    /// Map a function over the generated values, shrinks included.
    pub fn map<U, F>(&self, f: F) -> Gen<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Gen::new(move |size, seed| {
            let f = Rc::clone(&f);
            Ok(source.generate(size, seed)?.map(move |value| f(value)))
        })
    }

    /// Dependent generation: feed each generated value (and each of its
    /// shrinks) into `k` and flatten.
    ///
    /// The seed splits once; the continuation runs with the same second
    /// half for the original value and for every shrunk variant, so
    /// shrinking the outer value never perturbs the downstream
    /// randomness.
    pub fn bind<U, F>(&self, k: F) -> Gen<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> Gen<U> + 'static,
    {
        let source = self.clone();
        let k: Rc<dyn Fn(&T) -> Gen<U>> = Rc::new(k);
        Gen::new(move |size, seed| {
            let (outer_seed, inner_seed) = seed.split();
            let outer = source.generate(size, outer_seed)?;
            bind_tree(&outer, size, inner_seed, &k)
        })
    }

    /// Retry until the predicate holds, with the default of 10 tries.
    pub fn such_that<F>(&self, pred: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.such_that_with(10, pred)
    }

    /// Retry until the predicate holds. Each failed attempt bumps the
    /// size by one (to escape saturated small sample spaces) and
    /// re-splits the seed; exhaustion is a generation error, never a
    /// counterexample. The resulting tree only shrinks to values that
    /// satisfy the predicate.
    pub fn such_that_with<F>(&self, max_tries: usize, pred: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let source = self.clone();
        let pred: Rc<dyn Fn(&T) -> bool> = Rc::new(pred);
        Gen::new(move |size, seed| {
            let mut size = size;
            let mut seed = seed;
            for _ in 0..max_tries {
                let (rest, attempt_seed) = seed.split();
                let tree = source.generate(size, attempt_seed)?;
                if pred(tree.root()) {
                    let pred = Rc::clone(&pred);
                    return Ok(tree.filter(move |value| pred(value)));
                }
                size = Size::new(size.get() + 1);
                seed = rest;
            }
            Err(Error::SuchThatExhausted { max_tries })
        })
    }

    /// Defer generator construction until the size is known.
    pub fn sized<F>(f: F) -> Gen<T>
    where
        F: Fn(Size) -> Gen<T> + 'static,
    {
        Gen::new(move |size, seed| f(size).generate(size, seed))
    }

    /// Override the size.
    pub fn resize(&self, size: usize) -> Gen<T> {
        let source = self.clone();
        Gen::new(move |_size, seed| source.generate(Size::new(size), seed))
    }

    /// Adjust the size through `f` before generating.
    pub fn scale<F>(&self, f: F) -> Gen<T>
    where
        F: Fn(usize) -> usize + 'static,
    {
        let source = self.clone();
        Gen::new(move |size, seed| source.generate(Size::new(f(size.get())), seed))
    }

    /// Pick one of the given generators uniformly. Shrinks move toward
    /// earlier alternatives, then within the chosen generator.
    pub fn one_of(gens: Vec<Gen<T>>) -> Gen<T> {
        assert!(!gens.is_empty(), "one_of requires at least one generator");
        let last = (gens.len() - 1) as i64;
        Gen::<i64>::choose(0, last).bind(move |index| gens[*index as usize].clone())
    }

    /// Pick among weighted generators. Shrinks move toward the first
    /// entry, so put the simplest alternative first.
    pub fn frequency(weighted: Vec<(u64, Gen<T>)>) -> Gen<T> {
        assert!(
            !weighted.is_empty(),
            "frequency requires at least one generator"
        );
        assert!(
            weighted.iter().all(|(weight, _)| *weight > 0),
            "frequency weights must be positive"
        );
        let total: u64 = weighted.iter().map(|(weight, _)| weight).sum();
        Gen::<i64>::choose(1, total as i64).bind(move |pick| {
            let mut remaining = *pick as u64;
            for (weight, gen) in &weighted {
                if remaining <= *weight {
                    return gen.clone();
                }
                remaining -= weight;
            }
            unreachable!("pick is within the total weight")
        })
    }

    /// Pick one of the given values uniformly. Shrinks move toward
    /// earlier elements.
    pub fn elements(choices: Vec<T>) -> Gen<T> {
        assert!(
            !choices.is_empty(),
            "elements requires a non-empty collection"
        );
        let last = (choices.len() - 1) as i64;
        Gen::<i64>::choose(0, last).map(move |index| choices[*index as usize].clone())
    }
}

fn bind_tree<T, U>(
    outer: &Tree<T>,
    size: Size,
    inner_seed: Seed,
    k: &Rc<dyn Fn(&T) -> Gen<U>>,
) -> Result<Tree<U>>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    let inner = k(outer.root()).generate(size, inner_seed)?;
    let root = inner.root().clone();
    let outer = outer.clone();
    let k = Rc::clone(k);
    Ok(Tree::lazy(root, move || {
        // A shrunk outer value whose continuation can no longer
        // generate is dropped as a shrink candidate; the eager path
        // above has already surfaced real setup failures.
        let mut out: Vec<Tree<U>> = outer
            .children()
            .iter()
            .filter_map(|child| bind_tree(child, size, inner_seed, &k).ok())
            .collect();
        out.extend(inner.children().iter().cloned());
        out
    }))
}

/// Generate a single value at the default size of 30.
pub fn generate_one<T: Clone + 'static>(gen: &Gen<T>) -> Result<T> {
    generate_sized(gen, 30)
}

/// Generate a single value at the given size.
pub fn generate_sized<T: Clone + 'static>(gen: &Gen<T>, size: usize) -> Result<T> {
    Ok(gen
        .generate(Size::new(size), Seed::random())?
        .root()
        .clone())
}

/// Ten samples at increasing sizes.
pub fn sample<T: Clone + 'static>(gen: &Gen<T>) -> Result<Vec<T>> {
    sample_n(gen, 10)
}

/// `n` samples at sizes `0..n`.
pub fn sample_n<T: Clone + 'static>(gen: &Gen<T>, n: usize) -> Result<Vec<T>> {
    let mut seed = Seed::random();
    let mut out = Vec::with_capacity(n);
    for size in 0..n {
        let (rest, sample_seed) = seed.split();
        seed = rest;
        out.push(gen.generate(Size::new(size), sample_seed)?.root().clone());
    }
    Ok(out)
}

/// An endless stream of samples with sizes cycling `0..max_size`.
pub fn sample_iter<T: Clone + 'static>(gen: &Gen<T>, max_size: usize) -> SampleIter<T> {
    SampleIter {
        gen: gen.clone(),
        seed: Seed::random(),
        max_size: max_size.max(1),
        index: 0,
    }
}

/// Iterator returned by [`sample_iter`].
pub struct SampleIter<T> {
    gen: Gen<T>,
    seed: Seed,
    max_size: usize,
    index: usize,
}

impl<T: Clone + 'static> Iterator for SampleIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = Size::new(self.index % self.max_size);
        self.index += 1;
        let (rest, sample_seed) = self.seed.split();
        self.seed = rest;
        Some(
            self.gen
                .generate(size, sample_seed)
                .map(|tree| tree.root().clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn child_roots<T: Clone + 'static>(tree: &Tree<T>) -> Vec<T> {
        tree.children().iter().map(|c| c.root().clone()).collect()
    }

    #[test]
    fn test_constant_has_no_shrinks() {
        let gen = Gen::constant(7);
        let tree = gen.generate(Size::new(10), Seed::from_u64(1)).unwrap();
        assert_eq!(*tree.root(), 7);
        assert!(!tree.has_shrinks());
    }

    #[test]
    fn test_map_transforms_shrinks_too() {
        let gen = Gen::<i64>::choose(0, 100).map(|n| n * 2);
        let tree = gen.generate(Size::new(10), Seed::from_u64(5)).unwrap();
        assert_eq!(*tree.root() % 2, 0);
        for child in tree.children().iter() {
            assert_eq!(*child.root() % 2, 0);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let gen = Gen::<i64>::choose(0, 10).bind(|n| Gen::<i64>::choose(0, *n));
        let seed = Seed::from_u64(77);
        let a = gen.generate(Size::new(20), seed).unwrap();
        let b = gen.generate(Size::new(20), seed).unwrap();
        assert_eq!(a.root(), b.root());
        assert_eq!(child_roots(&a), child_roots(&b));
    }

    #[test]
    fn test_bind_of_constant_matches_continuation() {
        let seed = Seed::from_u64(13);
        let (_, inner_seed) = seed.split();

        let bound = Gen::constant(5i64).bind(|n| Gen::<i64>::choose(0, *n));
        let direct = Gen::<i64>::choose(0, 5);

        let bound_tree = bound.generate(Size::new(10), seed).unwrap();
        let direct_tree = direct.generate(Size::new(10), inner_seed).unwrap();
        assert_eq!(bound_tree.root(), direct_tree.root());
        assert_eq!(child_roots(&bound_tree), child_roots(&direct_tree));
    }

    #[test]
    fn test_bind_with_constant_continuation_keeps_roots() {
        let gen = Gen::<i64>::choose(3, 9);
        let bound = gen.clone().bind(|n| Gen::constant(*n));
        let seed = Seed::from_u64(21);

        let bound_tree = bound.generate(Size::new(10), seed).unwrap();
        let (outer_seed, _) = seed.split();
        let plain_tree = gen.generate(Size::new(10), outer_seed).unwrap();
        assert_eq!(bound_tree.root(), plain_tree.root());
    }

    #[test]
    fn test_such_that_filters_shrinks() {
        let gen = Gen::<i64>::choose(0, 100).such_that_with(40, |n| n % 2 == 0);
        let tree = gen.generate(Size::new(10), Seed::from_u64(4)).unwrap();
        assert_eq!(*tree.root() % 2, 0);
        for child in tree.children().iter() {
            assert_eq!(*child.root() % 2, 0, "shrinks must satisfy the predicate");
        }
    }

    #[test]
    fn test_such_that_exhaustion_counts_tries() {
        let tries = Rc::new(Cell::new(0));
        let counter = Rc::clone(&tries);
        let gen = Gen::constant(1).such_that(move |_| {
            counter.set(counter.get() + 1);
            false
        });

        let result = gen.generate(Size::new(0), Seed::from_u64(9));
        assert_eq!(result.unwrap_err(), Error::SuchThatExhausted { max_tries: 10 });
        assert_eq!(tries.get(), 10, "exhaustion after exactly max_tries attempts");
    }

    #[test]
    fn test_one_of_picks_from_alternatives() {
        let gen = Gen::one_of(vec![Gen::constant(1), Gen::constant(2), Gen::constant(3)]);
        let mut seed = Seed::from_u64(2);
        for _ in 0..50 {
            let (rest, s) = seed.split();
            seed = rest;
            let value = *gen.generate(Size::new(5), s).unwrap().root();
            assert!((1..=3).contains(&value));
        }
    }

    #[test]
    fn test_frequency_respects_weights() {
        let gen = Gen::frequency(vec![(1, Gen::constant(1)), (9, Gen::constant(2))]);
        let mut seed = Seed::from_u64(6);
        let mut heavy = 0;
        let mut light = 0;
        for _ in 0..200 {
            let (rest, s) = seed.split();
            seed = rest;
            match *gen.generate(Size::new(5), s).unwrap().root() {
                1 => light += 1,
                2 => heavy += 1,
                other => panic!("unexpected value {other}"),
            }
        }
        assert!(heavy > light, "weight 9 should dominate weight 1");
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_elements_rejects_empty_input() {
        let _ = Gen::<i64>::elements(Vec::new());
    }

    #[test]
    fn test_sized_and_resize() {
        let gen = Gen::sized(|size| Gen::constant(size.get()));
        let tree = gen.generate(Size::new(12), Seed::from_u64(1)).unwrap();
        assert_eq!(*tree.root(), 12);

        let resized = gen.resize(5);
        let tree = resized.generate(Size::new(12), Seed::from_u64(1)).unwrap();
        assert_eq!(*tree.root(), 5);

        let scaled = gen.scale(|n| n / 2);
        let tree = scaled.generate(Size::new(12), Seed::from_u64(1)).unwrap();
        assert_eq!(*tree.root(), 6);
    }

    #[test]
    fn test_sampling_helpers() {
        let gen = Gen::<i64>::choose(0, 9);
        let value = generate_one(&gen).unwrap();
        assert!((0..=9).contains(&value));

        let samples = sample(&gen).unwrap();
        assert_eq!(samples.len(), 10);

        let streamed: Vec<_> = sample_iter(&gen, 10)
            .take(25)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(streamed.len(), 25);
    }
}
