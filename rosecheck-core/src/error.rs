//! Error types for rosecheck property testing.

use thiserror::Error;

/// Generation-time failures.
///
/// Invalid combinator arguments (an empty `one_of`, a zero `frequency`
/// weight, inverted `choose` bounds) are programmer errors and panic at
/// construction time instead of surfacing here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `such_that` predicate or a distinct-collection generator could
    /// not be satisfied. Fatal for the run: this is a test-setup
    /// problem, never a counterexample.
    #[error("could not satisfy the generator predicate within {max_tries} tries")]
    SuchThatExhausted { max_tries: usize },
}

/// Result type for rosecheck operations.
pub type Result<T> = std::result::Result<T, Error>;
