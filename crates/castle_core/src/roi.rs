//! Return-on-investment scoring.
//!
//! Every score is "gain per hour of queue time": a producer upgrade gains
//! its rate increase, a production technology gains 5% of total output, a
//! mission gains its net average reward. Scores only rank candidates against
//! each other; their absolute values carry no meaning.

use serde::{Deserialize, Serialize};

use crate::actions::BuildingUpgrade;
use crate::buildings::{BuildingKind, BuildingRole};
use crate::data::{MissionData, TechData, PRODUCTION_BONUS_STEP, PRODUCTION_TECHNOLOGIES};
use crate::decision::Planner;
use crate::economy::SECONDS_PER_HOUR;
use crate::resources::{PerResource, Resource};
use crate::state::SimulationState;

/// Lowest rate used when computing supply shares.
const SUPPLY_FLOOR: f64 = 0.1;

/// Bounds of the scarcity multiplier.
const SCARCITY_MIN: f64 = 0.5;
const SCARCITY_MAX: f64 = 2.0;

/// Score used when an action takes no time at all.
const FREE_ACTION_FACTOR: f64 = 1000.0;

/// How demand shares are derived for the scarcity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcityModel {
    /// Fixed 40/40/20 wood/stone/iron demand.
    #[default]
    Fixed,
    /// Demand from the summed costs of all remaining target upgrades.
    RemainingDemand,
}

/// Net mission reward per hour.
#[must_use]
pub fn mission_roi(mission: &MissionData) -> f64 {
    mission.net_reward_per_hour()
}

fn hours(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR
}

impl Planner<'_> {
    /// Demand/supply multiplier for a resource, clamped to [0.5, 2.0].
    #[must_use]
    pub fn scarcity(&self, state: &SimulationState, resource: Resource) -> f64 {
        let Some(demand) = self.demand_shares(state) else {
            return 1.0;
        };

        let floored = PerResource(state.economy.rates.0.map(|rate| rate.max(SUPPLY_FLOOR)));
        let supply = floored[resource] / floored.total();

        (demand[resource] / supply).clamp(SCARCITY_MIN, SCARCITY_MAX)
    }

    fn demand_shares(&self, state: &SimulationState) -> Option<PerResource<f64>> {
        match self.options.scarcity {
            ScarcityModel::Fixed => Some(PerResource(
                Resource::ALL.map(Resource::assumed_demand_share),
            )),
            ScarcityModel::RemainingDemand => {
                let mut remaining = PerResource::splat(0.0);
                for kind in BuildingKind::ALL {
                    let (Some(target), Some(building)) =
                        (self.targets.building(kind), self.catalog.building(kind))
                    else {
                        continue;
                    };
                    let costs = building.costs_between(state.level(kind), target);
                    for resource in Resource::ALL {
                        remaining[resource] += f64::from(costs.get(resource));
                    }
                }
                let total = remaining.total();
                if total <= 0.0 {
                    return None;
                }
                Some(PerResource(remaining.0.map(|amount| amount / total)))
            }
        }
    }

    /// Score of a building upgrade.
    ///
    /// Producers score their rate gain per build hour times the scarcity of
    /// their resource. The tavern scores the mission value it unlocks when
    /// training during the build phase is enabled. Everything else scores 0.
    #[must_use]
    pub fn building_roi(&self, state: &SimulationState, upgrade: &BuildingUpgrade) -> f64 {
        let Some(building) = self.catalog.building(upgrade.kind) else {
            return 0.0;
        };
        let Some(data) = building.level(upgrade.to_level) else {
            return 0.0;
        };
        let build_hours = hours(data.build_time_seconds.max(1));

        match (upgrade.kind, upgrade.kind.role()) {
            (BuildingKind::Tavern, _) => {
                if self.options.train_during_build {
                    self.tavern_mission_value(upgrade.to_level) / build_hours
                } else {
                    0.0
                }
            }
            (BuildingKind::Arsenal, _) => 0.0,
            (_, BuildingRole::Producer(resource)) => {
                let Some(new_rate) = data.production_rate else {
                    return 0.0;
                };
                let gain = new_rate - building.production_rate(upgrade.from_level);
                gain / build_hours * self.scarcity(state, resource)
            }
            _ => 0.0,
        }
    }

    /// Best net mission ROI unlocked exactly at a tavern level, or failing
    /// that the best at a higher level discounted by its distance.
    #[must_use]
    pub fn tavern_mission_value(&self, to_level: u32) -> f64 {
        let missions = self.catalog.missions();

        let unlocked = missions
            .iter()
            .filter(|m| m.tavern_level == to_level)
            .map(mission_roi)
            .fold(0.0, f64::max);
        if unlocked > 0.0 {
            return unlocked;
        }

        let mut best = 0.0;
        for mission in missions.iter().filter(|m| m.tavern_level > to_level) {
            let roi = mission_roi(mission);
            if roi > best {
                let distance = f64::from(mission.tavern_level - to_level);
                best = roi / (distance + 1.0);
            }
        }
        best
    }

    /// Score of a production technology: 5% of total output per hour of
    /// research plus any library upgrades still needed.
    #[must_use]
    pub fn production_tech_roi(&self, state: &SimulationState, tech: &TechData) -> f64 {
        let gain = state.economy.total_rate() * PRODUCTION_BONUS_STEP;

        let library_level = state.level(BuildingKind::Library);
        let library_seconds = self
            .catalog
            .building(BuildingKind::Library)
            .map_or(0, |library| {
                library.build_seconds_between(library_level, tech.required_library_level)
            });

        let total_seconds = tech.research_time_seconds + library_seconds;
        if total_seconds == 0 {
            return gain * FREE_ACTION_FACTOR;
        }
        gain / hours(total_seconds)
    }

    /// Unresearched production technology with the highest positive score.
    #[must_use]
    pub fn best_production_tech(&self, state: &SimulationState) -> Option<(&TechData, f64)> {
        let mut best: Option<(&TechData, f64)> = None;
        for name in PRODUCTION_TECHNOLOGIES {
            if state.is_researched(name) {
                continue;
            }
            let Some(tech) = self.catalog.technology(name) else {
                continue;
            };
            let roi = self.production_tech_roi(state, tech);
            if roi > best.map_or(0.0, |(_, score)| score) {
                best = Some((tech, roi));
            }
        }
        best
    }
}
