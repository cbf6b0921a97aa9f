//! Numeric generators: bounded and size-scaled integers, IEEE-754
//! doubles, booleans, bytes and rationals.

use num::rational::Rational64;

use crate::data::Seed;
use crate::gen::Gen;
use crate::tree::Tree;

/// Uniform draw in `[lower, upper]`, inclusive. Span arithmetic runs in
/// `i128` so the full 64-bit range works; the result clamps at the
/// bounds against floating-point rounding.
pub(crate) fn rand_range(seed: Seed, lower: i64, upper: i64) -> (i64, Seed) {
    let (unit, next) = seed.next_double();
    let span = (upper as i128 - lower as i128) + 1;
    let offset = (unit * span as f64) as i128;
    let value = (lower as i128 + offset).clamp(lower as i128, upper as i128);
    (value as i64, next)
}

/// The shrink sequence for an integer: `value - value/2^k`, coarsest
/// first, so the first candidate is zero and later ones approach the
/// original.
fn halves(value: i64) -> Vec<i64> {
    let mut out = Vec::new();
    let mut step = value;
    while step != 0 {
        out.push(value - step);
        step /= 2;
    }
    out
}

fn int_tree(value: i64) -> Tree<i64> {
    Tree::lazy(value, move || halves(value).into_iter().map(int_tree).collect())
}

impl Gen<i64> {
    /// Uniform integer in `[lower, upper]`, shrinking toward zero by
    /// halves. Shrinks never leave the bounds.
    pub fn choose(lower: i64, upper: i64) -> Gen<i64> {
        assert!(lower <= upper, "choose requires lower <= upper");
        Gen::new(move |_size, seed| {
            let (value, _) = rand_range(seed, lower, upper);
            Ok(int_tree(value).filter(move |v| lower <= *v && *v <= upper))
        })
    }

    /// Size-scaled integer in `[-size, size]`.
    pub fn integer() -> Gen<i64> {
        Gen::sized(|size| Gen::choose(-(size.get() as i64), size.get() as i64))
    }

    /// Size-scaled non-negative integer in `[0, size]`.
    pub fn natural() -> Gen<i64> {
        Gen::sized(|size| Gen::choose(0, size.get() as i64))
    }

    /// Integer across the full 64-bit range, magnitude scaled by size.
    pub fn large_integer() -> Gen<i64> {
        Gen::large_integer_range(None, None)
    }

    /// Size-scaled integer restricted to `[min, max]` (either bound
    /// defaulting to the platform extreme).
    ///
    /// A bit count in `[1, min(size, 64)]` selects how many top bits of
    /// a raw draw survive; out-of-range values reflect by negate-and-
    /// halve until they fit. Ranges that exclude zero are generated
    /// against the nearer bound so shrinking converges onto it.
    pub fn large_integer_range(min: Option<i64>, max: Option<i64>) -> Gen<i64> {
        let lo = min.unwrap_or(i64::MIN);
        let hi = max.unwrap_or(i64::MAX);
        assert!(lo <= hi, "large_integer_range requires min <= max");
        if lo <= 0 && 0 <= hi {
            large_integer_zero(lo, hi)
        } else if lo > 0 {
            large_integer_zero(0, hi - lo).map(move |v| v + lo)
        } else {
            large_integer_zero(lo - hi, 0).map(move |v| v + hi)
        }
    }
}

/// Size-scaled integer generation for a range containing zero.
fn large_integer_zero(lo: i64, hi: i64) -> Gen<i64> {
    Gen::sized(move |size| {
        let max_bits = size.get().clamp(1, 64) as u32;
        Gen::new(move |_size, seed| {
            let (bits, seed) = seed.next_bounded(max_bits as u64);
            let bit_count = bits as u32 + 1;
            let (raw, _) = seed.next_i64();
            let mut value = raw >> (64 - bit_count);
            while value < lo || value > hi {
                value = -(value >> 1);
            }
            Ok(int_tree(value).filter(move |v| lo <= *v && *v <= hi))
        })
    })
}

impl Gen<bool> {
    /// Random boolean, shrinking toward `false`.
    pub fn bool() -> Gen<bool> {
        Gen::elements(vec![false, true])
    }
}

impl Gen<u8> {
    /// Uniform byte.
    pub fn byte() -> Gen<u8> {
        Gen::<i64>::choose(0, 255).map(|v| *v as u8)
    }
}

impl Gen<Vec<u8>> {
    /// Size-scaled byte vectors.
    pub fn bytes() -> Gen<Vec<u8>> {
        Gen::vec_of(Gen::<u8>::byte())
    }
}

/// Options for double generation.
#[derive(Debug, Clone, Copy)]
pub struct DoubleOpts {
    /// Allow `±∞` (only when no bound excludes them).
    pub infinite: bool,
    /// Allow `NaN` (only when unbounded).
    pub nan: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for DoubleOpts {
    fn default() -> Self {
        DoubleOpts {
            infinite: true,
            nan: true,
            min: None,
            max: None,
        }
    }
}

impl Gen<f64> {
    /// Any 64-bit IEEE-754 value, including `±∞` and `NaN`.
    pub fn double() -> Gen<f64> {
        Gen::double_opts(DoubleOpts::default())
    }

    /// Doubles with controllable specials and bounds.
    ///
    /// Finite values compose an exponent drawn from a size-scaled
    /// window around zero with a bit-reversed significand, so shrinking
    /// zeroes low-order mantissa bits and pulls the exponent toward
    /// zero. Specials mix in with small weights where the options and
    /// bounds allow them.
    pub fn double_opts(opts: DoubleOpts) -> Gen<f64> {
        let in_bounds = move |v: f64| {
            opts.min.map_or(true, |m| m <= v) && opts.max.map_or(true, |m| v <= m)
        };
        let mut entries: Vec<(u64, Gen<f64>)> = vec![(95, finite_double(opts.min, opts.max))];
        if in_bounds(0.0) {
            entries.push((1, Gen::constant(0.0)));
            entries.push((1, Gen::constant(-0.0)));
        }
        if opts.infinite {
            if in_bounds(f64::INFINITY) {
                entries.push((1, Gen::constant(f64::INFINITY)));
            }
            if in_bounds(f64::NEG_INFINITY) {
                entries.push((1, Gen::constant(f64::NEG_INFINITY)));
            }
        }
        if opts.nan && opts.min.is_none() && opts.max.is_none() {
            entries.push((1, Gen::constant(f64::NAN)));
        }
        Gen::frequency(entries)
    }
}

/// Reverse within the 52 significand bits.
fn reverse_bits_52(x: u64) -> u64 {
    x.reverse_bits() >> 12
}

fn finite_double(min: Option<f64>, max: Option<f64>) -> Gen<f64> {
    let gen = Gen::sized(move |size| {
        let s = size.get().min(200);
        let exp_bound = (1i64 << (s / 8)).min(1023);
        let bit_count = s.clamp(1, 52) as u32;

        let exponent = Gen::<i64>::choose(-exp_bound, exp_bound);
        let significand =
            Gen::<i64>::choose(0, ((1u64 << bit_count) - 1) as i64).map(|raw| reverse_bits_52(*raw as u64));
        let sign = Gen::elements(vec![1.0f64, -1.0]);

        Gen::<(i64, u64, f64)>::tuple3_of(exponent, significand, sign)
            .map(move |parts| compose_double(min, max, parts.0, parts.1, parts.2))
    });
    if min.is_some() || max.is_some() {
        let in_bounds = move |v: &f64| {
            min.map_or(true, |m| m <= *v) && max.map_or(true, |m| *v <= m)
        };
        gen.such_that(in_bounds)
    } else {
        gen
    }
}

fn compose_double(min: Option<f64>, max: Option<f64>, exp: i64, sig: u64, sign: f64) -> f64 {
    let mantissa = 1.0 + sig as f64 / (1u64 << 52) as f64;
    let mut value = sign * mantissa * 2f64.powi(exp as i32);
    // Values whose exponent block misses the requested range land on
    // the nearer bound, which the shrink filter then preserves.
    if let Some(m) = min {
        if value < m {
            value = m;
        }
    }
    if let Some(m) = max {
        if value > m {
            value = m;
        }
    }
    value
}

impl Gen<Rational64> {
    /// Ratio of a size-scaled numerator and a non-zero size-scaled
    /// denominator, reduced to normal form.
    pub fn ratio() -> Gen<Rational64> {
        Gen::<(i64, i64)>::tuple_of(
            Gen::<i64>::integer(),
            Gen::<i64>::integer().such_that(|d| *d != 0),
        )
        .map(|pair| Rational64::new(pair.0, pair.1))
    }
}
