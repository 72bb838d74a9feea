//! # Castle Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Synthetic catalogs and starting castles
//! - Determinism test harness
//! - Schedule invariant checker
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod invariants;

/// Re-export proptest for convenience.
pub use proptest;
