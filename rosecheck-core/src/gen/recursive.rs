//! Bounded recursive generation.

use std::rc::Rc;

use crate::data::Seed;
use crate::gen::Gen;

/// Log-uniform factoring of `n` into factors greater than one whose
/// product stays at or below `n`. The factor list bounds how many
/// container layers the recursive generator may nest.
fn pseudo_factors(seed: Seed, n: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut remaining = n;
    let mut current = seed;
    while remaining > 1 {
        let (rest, draw) = current.split();
        current = rest;
        let (unit, _) = draw.next_double();
        let factor = ((remaining as f64).powf(unit).floor() as u64).clamp(2, remaining);
        out.push(factor);
        remaining /= factor;
    }
    out
}

/// Recursively nested structures without the size explosion naive
/// recursion causes.
///
/// A shrinkable leaf budget is drawn from `[0, size^1.1]` and factored;
/// the generator folds over the factors starting from the scalar, each
/// step either keeping the scalar (one chance in eleven) or wrapping the
/// accumulated generator in `container` resized to the factor. The
/// expected leaf count stays within the budget.
pub fn recursive_of<T, F>(container: F, scalar: Gen<T>) -> Gen<T>
where
    T: Clone + 'static,
    F: Fn(Gen<T>) -> Gen<T> + 'static,
{
    let container = Rc::new(container);
    Gen::sized(move |size| {
        let container = Rc::clone(&container);
        let scalar = scalar.clone();
        let budget = (size.get() as f64).powf(1.1).floor() as i64;
        Gen::<i64>::choose(0, budget).bind(move |max_leaves| {
            let max_leaves = *max_leaves as u64;
            let container = Rc::clone(&container);
            let scalar = scalar.clone();
            Gen::new(move |_inner_size, seed| {
                let (seed, factor_seed) = seed.split();
                let factors = pseudo_factors(factor_seed, max_leaves);
                let mut gen = scalar.resize(size.get());
                let mut current = seed;
                for factor in factors {
                    let (rest, coin_seed) = current.split();
                    current = rest;
                    let (coin, _) = coin_seed.next_bounded(11);
                    gen = if coin == 0 {
                        scalar.resize(size.get())
                    } else {
                        container(gen).resize(factor as usize)
                    };
                }
                gen.generate(size, current)
            })
        })
    })
}
