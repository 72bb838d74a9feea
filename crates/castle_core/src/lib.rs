//! # Castle Core
//!
//! Deterministic build-order scheduler for a castle base-building game.
//!
//! Given a starting castle, target building levels and the static game
//! data, the solver produces a fully timed schedule of building upgrades,
//! research, unit training and tavern missions. Resources accumulate
//! continuously; storage and population are hard caps; some upgrades wait
//! on technologies.
//!
//! This crate contains **only** deterministic logic:
//! - No IO
//! - No wall clock
//! - No randomness
//! - No hash-map iteration that could influence results
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Static building, technology, unit and mission data
//! - [`config`] - Initial state, targets and user configuration
//! - [`economy`] - Resource accumulation and affordability
//! - [`events`] - Discrete-event queue
//! - [`decision`] - Greedy ROI-driven choice per queue
//! - [`prerequisites`] - Population, storage and technology substitution
//! - [`solver`] - The scheduling loop
//! - [`strategy`] - Parallel resource-lead search
//! - [`schedule`] - The timed result

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod buildings;
pub mod catalog;
pub mod config;
pub mod data;
pub mod decision;
pub mod economy;
pub mod error;
pub mod events;
pub mod missions;
pub mod prerequisites;
pub mod resources;
pub mod roi;
pub mod schedule;
pub mod solver;
pub mod state;
pub mod strategy;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{BuildingUpgrade, NextAction, QueueKind};
    pub use crate::buildings::{BuildingKind, BuildingLevels, PerBuilding};
    pub use crate::catalog::{Catalog, CatalogIssue};
    pub use crate::config::{CastleConfig, InitialState, Targets};
    pub use crate::data::{BuildingData, BuildingLevelData, MissionData, TechData, UnitData};
    pub use crate::error::{CastleError, Result};
    pub use crate::resources::{Costs, PerResource, Resource};
    pub use crate::roi::ScarcityModel;
    pub use crate::schedule::{Schedule, TimelineEntry, UnmetTarget};
    pub use crate::solver::{Solver, SolverOptions};
    pub use crate::state::FinalState;
    pub use crate::strategy::{ResourceStrategy, SearchConfig, SearchOutcome, Trial};
    pub use crate::units::{Army, UnitKind};
}
