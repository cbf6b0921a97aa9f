//! The test driver: trial sequencing, reporting, and the shrink search.

use std::collections::VecDeque;

use crate::data::{Config, Seed, Size};
use crate::error::Result;
use crate::property::{Property, Trial, TrialOutcome};
use crate::tree::Tree;

/// Structured progress events fed to the reporter callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<T> {
    /// A trial passed.
    Trial { so_far: usize, num_tests: usize },
    /// A counterexample was found; shrinking starts next.
    Failure {
        trial_number: usize,
        result: TrialOutcome,
        failing_args: T,
    },
    /// The shrink search found a smaller counterexample.
    ShrinkStep {
        visited: usize,
        depth: usize,
        smaller: T,
    },
}

/// Summary of the shrink search.
#[derive(Debug, Clone, PartialEq)]
pub struct Shrunk<T> {
    pub total_nodes_visited: usize,
    pub depth: usize,
    /// Outcome at the minimal counterexample.
    pub result: TrialOutcome,
    pub smallest: T,
}

/// Final report of a `quick_check` run. Equal inputs produce equal
/// reports: re-running with the recorded seed and the same
/// configuration replays the run exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Report<T> {
    Passed {
        num_tests: usize,
        seed: u64,
    },
    Failed {
        /// Trials run up to and including the failing one.
        num_tests: usize,
        seed: u64,
        /// Size at which the counterexample appeared.
        failing_size: usize,
        /// Outcome of the original (unshrunk) counterexample.
        result: TrialOutcome,
        /// The original counterexample.
        fail: T,
        shrunk: Shrunk<T>,
    },
}

impl<T> Report<T> {
    pub fn passed(&self) -> bool {
        matches!(self, Report::Passed { .. })
    }
}

/// Run up to `num_tests` trials of the property, shrinking the first
/// counterexample found.
///
/// A `SuchThatExhausted` from a generator is a test-setup error and
/// surfaces as `Err`, never as a counterexample.
pub fn quick_check<T>(
    num_tests: usize,
    property: &Property<T>,
    config: &Config,
) -> Result<Report<T>>
where
    T: Clone + 'static,
{
    quick_check_with(num_tests, property, config, |_event| {})
}

/// Like [`quick_check`], emitting an [`Event`] per trial, on failure,
/// and on every improvement the shrink search makes.
pub fn quick_check_with<T, R>(
    num_tests: usize,
    property: &Property<T>,
    config: &Config,
    mut reporter: R,
) -> Result<Report<T>>
where
    T: Clone + 'static,
    R: FnMut(&Event<T>),
{
    let seed_value = match config.seed {
        Some(value) => value,
        None => Seed::from_millis().0,
    };
    let mut rng = Seed::from_u64(seed_value);
    let size_cycle = config.max_size.max(1);

    for trial in 0..num_tests {
        let size = Size::new(trial % size_cycle);
        let (rest, trial_seed) = rng.split();
        rng = rest;

        let tree = property.trials().generate(size, trial_seed)?;
        if tree.root().outcome.is_pass() {
            reporter(&Event::Trial {
                so_far: trial + 1,
                num_tests,
            });
            continue;
        }

        reporter(&Event::Failure {
            trial_number: trial + 1,
            result: tree.root().outcome.clone(),
            failing_args: tree.root().args.clone(),
        });
        let shrunk = shrink_search(&tree, &mut reporter);
        return Ok(Report::Failed {
            num_tests: trial + 1,
            seed: seed_value,
            failing_size: size.get(),
            result: tree.root().outcome.clone(),
            fail: tree.root().args.clone(),
            shrunk,
        });
    }

    Ok(Report::Passed {
        num_tests,
        seed: seed_value,
    })
}

/// Depth-first search for a minimal counterexample.
///
/// The walk commits to each deeper failure it finds: a passing node is
/// dropped from the frontier, a failing node becomes the new smallest
/// and the search descends into its children, abandoning the rest of
/// the frontier. It never backtracks, so the result is a local minimum
/// reached by a fixed, reproducible traversal rather than a global one.
fn shrink_search<T, R>(tree: &Tree<Trial<T>>, reporter: &mut R) -> Shrunk<T>
where
    T: Clone + 'static,
    R: FnMut(&Event<T>),
{
    let mut frontier: VecDeque<Tree<Trial<T>>> = tree.children().iter().cloned().collect();
    let mut smallest = tree.root().clone();
    let mut visited = 0;
    let mut depth = 0;

    while let Some(node) = frontier.pop_front() {
        visited += 1;
        if node.root().outcome.is_pass() {
            continue;
        }

        smallest = node.root().clone();
        reporter(&Event::ShrinkStep {
            visited,
            depth,
            smaller: smallest.args.clone(),
        });

        let children = node.children();
        if !children.is_empty() {
            depth += 1;
            frontier = children.iter().cloned().collect();
        }
    }

    Shrunk {
        total_nodes_visited: visited,
        depth,
        result: smallest.outcome.clone(),
        smallest: smallest.args,
    }
}
