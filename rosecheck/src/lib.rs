//! rosecheck property-based testing library.
//!
//! This is the main entry point for the rosecheck library, providing
//! a convenient API for property-based testing with integrated
//! shrinking in Rust.

pub use rosecheck_core::*;
