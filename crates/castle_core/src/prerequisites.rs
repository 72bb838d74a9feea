//! Prerequisite resolution for building upgrades.
//!
//! A candidate upgrade may need something else first: population room, a
//! bigger store, or a technology. Checks run in that fixed order and at most
//! one substitution is made per call. The caller re-resolves on every
//! wake-up, so chains of prerequisites unfold one step at a time.

use serde::{Deserialize, Serialize};

use crate::actions::BuildingUpgrade;
use crate::buildings::BuildingKind;
use crate::decision::Planner;
use crate::state::SimulationState;

/// What to do about a building candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Build this upgrade; either the candidate or a substitute.
    Build(BuildingUpgrade),
    /// Research this technology before anything else can be built.
    Research(String),
    /// Nothing can be done for the candidate right now.
    Blocked,
}

impl Planner<'_> {
    /// Resolve a candidate to the action that should actually run.
    #[must_use]
    pub fn resolve(&self, state: &SimulationState, upgrade: BuildingUpgrade) -> Resolution {
        let Some(data) = self.catalog.level(upgrade.kind, upgrade.to_level) else {
            return Resolution::Blocked;
        };
        let costs = data.costs;

        if !state.can_afford_food(costs.food) && upgrade.kind != BuildingKind::Farm {
            if let Some(farm) = self.next_upgrade(state, BuildingKind::Farm) {
                return self.gated(state, farm);
            }
        }

        if let Some(resource) = state.economy.exceeds_cap(&costs) {
            let store = BuildingKind::store_of(resource);
            if upgrade.kind != store {
                if let Some(upgrade) = self.next_upgrade(state, store) {
                    return self.gated(state, upgrade);
                }
            }
        }

        self.gated(state, upgrade)
    }

    fn next_upgrade(&self, state: &SimulationState, kind: BuildingKind) -> Option<BuildingUpgrade> {
        let current = state.level(kind);
        self.catalog
            .level(kind, current + 1)
            .map(|_| BuildingUpgrade::next(kind, current))
    }

    /// Apply the technology gate of an upgrade.
    fn gated(&self, state: &SimulationState, upgrade: BuildingUpgrade) -> Resolution {
        let Some(name) = self.catalog.tech_for_level(upgrade.kind, upgrade.to_level) else {
            return Resolution::Build(upgrade);
        };
        if state.is_researched(name) {
            return Resolution::Build(upgrade);
        }
        let Some(tech) = self.catalog.technology(name) else {
            return Resolution::Blocked;
        };

        if state.level(BuildingKind::Library) >= tech.required_library_level {
            return Resolution::Research(tech.name.clone());
        }
        if upgrade.kind == BuildingKind::Library {
            // The library cannot unlock its own gate.
            return Resolution::Blocked;
        }
        match self.next_upgrade(state, BuildingKind::Library) {
            Some(library) => self.gated(state, library),
            None => Resolution::Blocked,
        }
    }
}
