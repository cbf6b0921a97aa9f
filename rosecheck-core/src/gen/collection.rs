//! Collection generators: tuples, vectors, ordered sequences, distinct
//! collections and shuffles.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::rc::Rc;

use crate::data::{Seed, Size};
use crate::error::{Error, Result};
use crate::gen::number::rand_range;
use crate::gen::Gen;
use crate::tree::{shrink_all, zip2, zip_all, Tree};

impl<A: Clone + 'static, B: Clone + 'static> Gen<(A, B)> {
    /// Pair of independently generated components. Shrinks one
    /// component at a time; the arity is fixed.
    pub fn tuple_of(first: Gen<A>, second: Gen<B>) -> Gen<(A, B)> {
        Gen::new(move |size, seed| {
            let (s1, s2) = seed.split();
            let left = first.generate(size, s1)?;
            let right = second.generate(size, s2)?;
            Ok(zip2(|a: &A, b: &B| (a.clone(), b.clone()), left, right))
        })
    }
}

impl<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static> Gen<(A, B, C)> {
    /// Triple of independently generated components.
    pub fn tuple3_of(first: Gen<A>, second: Gen<B>, third: Gen<C>) -> Gen<(A, B, C)> {
        Gen::new(move |size, seed| {
            let seeds = seed.split_n(3);
            let a = first.generate(size, seeds[0])?;
            let b = second.generate(size, seeds[1])?;
            let c = third.generate(size, seeds[2])?;
            let ab = zip2(|a: &A, b: &B| (a.clone(), b.clone()), a, b);
            Ok(zip2(
                |ab: &(A, B), c: &C| (ab.0.clone(), ab.1.clone(), c.clone()),
                ab,
                c,
            ))
        })
    }
}

fn element_trees<T: Clone + 'static>(
    element: &Gen<T>,
    size: Size,
    seed: Seed,
    count: usize,
) -> Result<Vec<Tree<T>>> {
    let mut out = Vec::with_capacity(count);
    let mut current = seed;
    for _ in 0..count {
        let (rest, element_seed) = current.split();
        current = rest;
        out.push(element.generate(size, element_seed)?);
    }
    Ok(out)
}

impl<T: Clone + 'static> Gen<Vec<T>> {
    /// Vectors with length uniform in `[0, size]`. Shrinks drop
    /// elements and shrink the ones that remain.
    pub fn vec_of(element: Gen<T>) -> Gen<Vec<T>> {
        Gen::new(move |size, seed| {
            let (length_seed, elements_seed) = seed.split();
            let (length, _) = length_seed.next_bounded(size.get() as u64 + 1);
            let trees = element_trees(&element, size, elements_seed, length as usize)?;
            Ok(shrink_all(|xs: &[T]| xs.to_vec(), trees))
        })
    }

    /// Fixed-length vectors. Only elements shrink.
    pub fn vec_of_len(element: Gen<T>, length: usize) -> Gen<Vec<T>> {
        Gen::new(move |size, seed| {
            let trees = element_trees(&element, size, seed, length)?;
            Ok(zip_all(|xs: &[T]| xs.to_vec(), trees))
        })
    }

    /// Vectors with length uniform in `[min_len, max_len]`; shrinking
    /// never goes below the minimum length.
    pub fn vec_bounded(element: Gen<T>, min_len: usize, max_len: usize) -> Gen<Vec<T>> {
        assert!(min_len <= max_len, "vec_bounded requires min_len <= max_len");
        Gen::new(move |size, seed| {
            let (length_seed, elements_seed) = seed.split();
            let (length, _) = rand_range(length_seed, min_len as i64, max_len as i64);
            let trees = element_trees(&element, size, elements_seed, length as usize)?;
            Ok(shrink_all(|xs: &[T]| xs.to_vec(), trees)
                .filter(move |v: &Vec<T>| v.len() >= min_len))
        })
    }

    /// Run each generator at its position. Homogeneous n-ary tuple:
    /// the length is fixed, elements shrink independently.
    pub fn tuple_vec(gens: Vec<Gen<T>>) -> Gen<Vec<T>> {
        Gen::new(move |size, seed| {
            let seeds = seed.split_n(gens.len());
            let mut trees = Vec::with_capacity(gens.len());
            for (gen, element_seed) in gens.iter().zip(seeds) {
                trees.push(gen.generate(size, element_seed)?);
            }
            Ok(zip_all(|xs: &[T]| xs.to_vec(), trees))
        })
    }

    /// A random permutation reached by swap pairs; shrinking drops
    /// swaps, converging on the original ordering.
    pub fn shuffle_of(coll: Vec<T>) -> Gen<Vec<T>> {
        if coll.len() < 2 {
            return Gen::constant(coll);
        }
        let last = (coll.len() - 1) as i64;
        let max_swaps = 2 * coll.len();
        let swap =
            Gen::<(i64, i64)>::tuple_of(Gen::<i64>::choose(0, last), Gen::<i64>::choose(0, last));
        Gen::<Vec<(i64, i64)>>::vec_bounded(swap, 0, max_swaps).map(move |swaps| {
            let mut out = coll.clone();
            for &(i, j) in swaps {
                out.swap(i as usize, j as usize);
            }
            out
        })
    }
}

impl<T: Clone + 'static> Gen<VecDeque<T>> {
    /// Ordered sequences, same sizing and shrinking as [`Gen::vec_of`].
    pub fn deque_of(element: Gen<T>) -> Gen<VecDeque<T>> {
        Gen::<Vec<T>>::vec_of(element).map(|v| v.iter().cloned().collect())
    }
}

/// Options for distinct-collection generators.
#[derive(Debug, Clone, Copy)]
pub struct CollectionOpts {
    /// Exact element count; overrides the min/max bounds.
    pub num_elements: Option<usize>,
    pub min_elements: Option<usize>,
    pub max_elements: Option<usize>,
    /// Consecutive duplicate draws tolerated before giving up.
    pub max_tries: usize,
}

impl Default for CollectionOpts {
    fn default() -> Self {
        CollectionOpts {
            num_elements: None,
            min_elements: None,
            max_elements: None,
            max_tries: 10,
        }
    }
}

impl CollectionOpts {
    pub fn exactly(n: usize) -> Self {
        CollectionOpts {
            num_elements: Some(n),
            ..CollectionOpts::default()
        }
    }

    pub fn at_least(mut self, n: usize) -> Self {
        self.min_elements = Some(n);
        self
    }

    pub fn at_most(mut self, n: usize) -> Self {
        self.max_elements = Some(n);
        self
    }

    pub fn with_max_tries(mut self, tries: usize) -> Self {
        self.max_tries = tries;
        self
    }

    fn validate(&self) {
        if let (Some(lo), Some(hi)) = (self.min_elements, self.max_elements) {
            assert!(lo <= hi, "min_elements must not exceed max_elements");
        }
        assert!(self.max_tries > 0, "max_tries must be positive");
    }

    fn len_ok(&self, len: usize) -> bool {
        match self.num_elements {
            Some(n) => len == n,
            None => len >= self.min_elements.unwrap_or(0),
        }
    }
}

/// Shared core of the distinct-collection generators.
///
/// Draws one element at a time, keyed by `key_fn`. A duplicate key
/// bumps the draw size (pushing toward more variety) and counts against
/// `max_tries`; exhaustion below the required minimum is a generation
/// error. Ordered targets get their element trees shuffled so the
/// element ordering is uniform, then the tree shrinks by dropping and
/// shrinking elements, filtered through `accept`.
fn distinct_gen<T, K, C>(
    element: Gen<T>,
    key_fn: Rc<dyn Fn(&T) -> K>,
    build: Rc<dyn Fn(&[T]) -> C>,
    accept: Rc<dyn Fn(&C) -> bool>,
    ordered: bool,
    opts: CollectionOpts,
) -> Gen<C>
where
    T: Clone + 'static,
    K: Hash + Eq + 'static,
    C: Clone + 'static,
{
    opts.validate();
    Gen::new(move |size, seed| {
        let (mut current, target) = match opts.num_elements {
            Some(n) => (seed, n),
            None => {
                let lo = opts.min_elements.unwrap_or(0);
                let hi = opts.max_elements.unwrap_or(lo + size.get());
                let (rest, length_seed) = seed.split();
                let (length, _) = length_seed.next_bounded((hi - lo + 1) as u64);
                (rest, lo + length as usize)
            }
        };
        let min_needed = opts.num_elements.or(opts.min_elements).unwrap_or(0);

        let mut trees: Vec<Tree<T>> = Vec::with_capacity(target);
        let mut seen = HashSet::with_capacity(target);
        let mut draw_size = size;
        let mut tries = 0;
        while trees.len() < target {
            if tries >= opts.max_tries {
                if opts.num_elements.is_none() && trees.len() >= min_needed {
                    break;
                }
                return Err(Error::SuchThatExhausted {
                    max_tries: opts.max_tries,
                });
            }
            let (rest, element_seed) = current.split();
            current = rest;
            let tree = element.generate(draw_size, element_seed)?;
            if seen.insert(key_fn(tree.root())) {
                trees.push(tree);
                tries = 0;
            } else {
                tries += 1;
                draw_size = Size::new(draw_size.get() + 1);
            }
        }

        if ordered && trees.len() > 1 {
            let mut shuffle_seed = current;
            for i in (1..trees.len()).rev() {
                let (j, next) = shuffle_seed.next_bounded(i as u64 + 1);
                shuffle_seed = next;
                trees.swap(i, j as usize);
            }
        }

        let build = Rc::clone(&build);
        let accept = Rc::clone(&accept);
        Ok(shrink_all(move |xs: &[T]| build(xs), trees).filter(move |coll| accept(coll)))
    })
}

impl<T> Gen<HashSet<T>>
where
    T: Clone + Eq + Hash + 'static,
{
    /// Sets of distinct elements.
    pub fn set_of(element: Gen<T>, opts: CollectionOpts) -> Gen<HashSet<T>> {
        distinct_gen(
            element,
            Rc::new(|value: &T| value.clone()),
            Rc::new(|xs: &[T]| xs.iter().cloned().collect()),
            Rc::new(move |set: &HashSet<T>| opts.len_ok(set.len())),
            false,
            opts,
        )
    }
}

impl<T> Gen<BTreeSet<T>>
where
    T: Clone + Ord + Hash + 'static,
{
    /// Sorted sets of distinct elements.
    pub fn sorted_set_of(element: Gen<T>, opts: CollectionOpts) -> Gen<BTreeSet<T>> {
        distinct_gen(
            element,
            Rc::new(|value: &T| value.clone()),
            Rc::new(|xs: &[T]| xs.iter().cloned().collect()),
            Rc::new(move |set: &BTreeSet<T>| opts.len_ok(set.len())),
            false,
            opts,
        )
    }
}

impl<K, V> Gen<HashMap<K, V>>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    /// Maps with distinct keys.
    pub fn map_of(keys: Gen<K>, values: Gen<V>, opts: CollectionOpts) -> Gen<HashMap<K, V>> {
        distinct_gen(
            Gen::<(K, V)>::tuple_of(keys, values),
            Rc::new(|entry: &(K, V)| entry.0.clone()),
            Rc::new(|xs: &[(K, V)]| xs.iter().cloned().collect()),
            Rc::new(move |map: &HashMap<K, V>| opts.len_ok(map.len())),
            false,
            opts,
        )
    }
}

impl<T> Gen<Vec<T>>
where
    T: Clone + Eq + Hash + 'static,
{
    /// Vectors of distinct elements, uniformly ordered.
    pub fn vec_distinct(element: Gen<T>, opts: CollectionOpts) -> Gen<Vec<T>> {
        Gen::vec_distinct_by(element, |value: &T| value.clone(), opts)
    }
}

impl<T: Clone + 'static> Gen<Vec<T>> {
    /// Vectors whose elements are distinct under `key_fn`, uniformly
    /// ordered. Since a vector can express duplicates, shrunk elements
    /// are re-checked for distinctness.
    pub fn vec_distinct_by<K, F>(element: Gen<T>, key_fn: F, opts: CollectionOpts) -> Gen<Vec<T>>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let key_fn: Rc<dyn Fn(&T) -> K> = Rc::new(key_fn);
        let accept_key = Rc::clone(&key_fn);
        distinct_gen(
            element,
            key_fn,
            Rc::new(|xs: &[T]| xs.to_vec()),
            Rc::new(move |v: &Vec<T>| {
                if !opts.len_ok(v.len()) {
                    return false;
                }
                let mut seen = HashSet::with_capacity(v.len());
                v.iter().all(|item| seen.insert(accept_key(item)))
            }),
            true,
            opts,
        )
    }
}

impl<T: Clone + 'static> Gen<Option<T>> {
    /// `Some` three times out of four; shrinks toward `None`, then
    /// within the inner value.
    pub fn option_of(inner: Gen<T>) -> Gen<Option<T>> {
        Gen::frequency(vec![
            (1, Gen::constant(None)),
            (3, inner.map(|value| Some(value.clone()))),
        ])
    }
}

impl<T, E> Gen<std::result::Result<T, E>>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// `Ok` three times out of four; errors shrink toward `Ok`.
    pub fn result_of(ok: Gen<T>, err: Gen<E>) -> Gen<std::result::Result<T, E>> {
        Gen::frequency(vec![
            (3, ok.map(|value| Ok(value.clone()))),
            (1, err.map(|error| Err(error.clone()))),
        ])
    }
}
