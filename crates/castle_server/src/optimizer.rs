//! Army composition seam.
//!
//! Once a castle has no building upgrades left, the service asks an
//! [`ArmyOptimizer`] what army to keep with the spare population. The
//! optimizer itself lives outside this workspace; [`NoRecommendation`] is
//! the stand-in used when none is plugged in.

use serde::{Deserialize, Serialize};

use castle_core::buildings::BuildingRole;
use castle_core::prelude::*;

/// Trade distance assumed for a fully built keep.
pub const TRADE_DISTANCE: u32 = 25;

/// A suggested standing army.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsRecommendation {
    /// Units per kind.
    pub units: Army,
    /// Population the army uses.
    pub total_food: u32,
    /// Resources per hour the army can move to market.
    pub throughput: f64,
}

/// Chooses an army for a population budget.
pub trait ArmyOptimizer: Send + Sync {
    /// Recommend an army, or `None` to recommend nothing.
    fn solve(
        &self,
        food_budget: u32,
        production_rate: f64,
        trade_distance: u32,
    ) -> Option<UnitsRecommendation>;
}

/// Optimizer that never recommends anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecommendation;

impl ArmyOptimizer for NoRecommendation {
    fn solve(&self, _: u32, _: f64, _: u32) -> Option<UnitsRecommendation> {
        None
    }
}

/// Farm capacity at the current level minus the population every built
/// level has consumed.
pub fn food_budget(catalog: &Catalog, levels: &BuildingLevels) -> u32 {
    let capacity = catalog
        .level(BuildingKind::Farm, levels[BuildingKind::Farm])
        .and_then(|data| data.storage_capacity)
        .unwrap_or(0);
    let consumed: u32 = BuildingKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let building = catalog.building(kind)?;
            Some(building.costs_between(0, levels[kind]).food)
        })
        .sum();
    capacity.saturating_sub(consumed)
}

/// Summed hourly rate of the three producers at their current levels.
pub fn production_rate(catalog: &Catalog, levels: &BuildingLevels) -> f64 {
    BuildingKind::ALL
        .into_iter()
        .filter(|kind| matches!(kind.role(), BuildingRole::Producer(_)))
        .filter_map(|kind| catalog.building(kind))
        .map(|building| building.production_rate(levels[building.kind]))
        .sum()
}
