//! Command-line front end for the castle scheduler.
//!
//! This crate wraps [`castle_core`] with the pieces a person at a terminal
//! needs:
//!
//! - **Loading**: the catalog from a data directory and an optional JSON or
//!   RON configuration ([`loader`])
//! - **Reporting**: strategy comparison, action table and target summary
//!   ([`report`])
//!
//! # Example
//!
//! ```bash
//! # Full plan for the default castle
//! cargo run -p castle_headless --bin castle -- --data data
//!
//! # Only the action to take right now
//! cargo run -p castle_headless --bin castle -- -c castle.json --next
//!
//! # Re-solve five times and compare fingerprints
//! cargo run -p castle_headless --bin castle -- verify --runs 5
//! ```

pub mod loader;
pub mod report;

pub use loader::{
    load_catalog, load_config, problem_from_config, resolve_data_dir, CatalogLoadError,
};
pub use report::{action_table, mission_table, save_schedule, strategy_table, summary};
