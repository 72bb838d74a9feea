//! Greedy choice of the next action for each queue.
//!
//! The [`Planner`] never mutates state. It ranks what could be started now;
//! the solver decides whether the pick is affordable and executes it.

use std::cmp::Ordering;

use crate::actions::BuildingUpgrade;
use crate::buildings::BuildingKind;
use crate::catalog::Catalog;
use crate::config::Targets;
use crate::data::{TechData, PRODUCTION_TECHNOLOGIES};
use crate::roi::mission_roi;
use crate::solver::SolverOptions;
use crate::state::SimulationState;
use crate::units::UnitKind;

/// Read-only view of everything a decision depends on besides the state.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    /// Static game data.
    pub catalog: &'a Catalog,
    /// What the run should reach.
    pub targets: &'a Targets,
    /// Tuning knobs.
    pub options: &'a SolverOptions,
}

impl<'a> Planner<'a> {
    /// Bundle the inputs of a run.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, targets: &'a Targets, options: &'a SolverOptions) -> Self {
        Self {
            catalog,
            targets,
            options,
        }
    }

    // ========================================================================
    // Target checks
    // ========================================================================

    /// Whether every building is at or above its target.
    #[must_use]
    pub fn building_targets_reached(&self, state: &SimulationState) -> bool {
        BuildingKind::ALL.into_iter().all(|kind| {
            self.targets
                .building(kind)
                .map_or(true, |target| state.level(kind) >= target)
        })
    }

    /// Whether the training queue and the tavern may be used: once every
    /// building target is reached, or at any time with `train_during_build`.
    #[must_use]
    pub fn army_phase(&self, state: &SimulationState) -> bool {
        self.options.train_during_build || self.building_targets_reached(state)
    }

    /// Owned units of a kind, counting those away on missions.
    #[must_use]
    pub fn owned_units(state: &SimulationState, kind: UnitKind) -> u32 {
        state.army.get(kind) + state.on_mission.get(kind)
    }

    /// Whether buildings, technologies and units are all at target.
    #[must_use]
    pub fn all_targets_reached(&self, state: &SimulationState) -> bool {
        self.building_targets_reached(state)
            && self
                .targets
                .technologies
                .iter()
                .all(|name| state.is_researched(name))
            && self
                .targets
                .units
                .iter()
                .all(|(kind, count)| Self::owned_units(state, kind) >= count)
    }

    // ========================================================================
    // Building queue
    // ========================================================================

    /// Ranked building candidates before prerequisite resolution.
    ///
    /// Productive upgrades come first by ROI. Only when none remain are the
    /// zero-ROI upgrades offered, quickest first. A library upgrade is put in
    /// front when a production technology outscores the best candidate but
    /// the library is still below its gate.
    #[must_use]
    pub fn building_plan(&self, state: &SimulationState) -> Vec<BuildingUpgrade> {
        let mut productive: Vec<(BuildingUpgrade, f64)> = Vec::new();
        let mut idle: Vec<BuildingUpgrade> = Vec::new();

        for kind in BuildingKind::ALL {
            let Some(target) = self.targets.building(kind) else {
                continue;
            };
            let current = state.level(kind);
            if current >= target || self.catalog.level(kind, current + 1).is_none() {
                continue;
            }
            let upgrade = BuildingUpgrade::next(kind, current);
            let roi = self.building_roi(state, &upgrade);
            if roi > 0.0 {
                productive.push((upgrade, roi));
            } else {
                idle.push(upgrade);
            }
        }

        self.apply_lead(state, &mut productive);

        let mut plan: Vec<BuildingUpgrade> = if productive.is_empty() {
            if let Some(library) = self.library_for_target_technologies(state) {
                if !idle.contains(&library) {
                    idle.push(library);
                }
            }
            idle.sort_by(|a, b| {
                self.build_seconds(a)
                    .cmp(&self.build_seconds(b))
                    .then_with(|| a.kind.name().cmp(b.kind.name()))
            });
            idle
        } else {
            productive.sort_by(|(a, roi_a), (b, roi_b)| {
                roi_b
                    .partial_cmp(roi_a)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.kind.name().cmp(b.kind.name()))
            });
            productive.into_iter().map(|(upgrade, _)| upgrade).collect()
        };

        if let Some(library) = self.library_for_production_tech(state, plan.first()) {
            plan.retain(|upgrade| *upgrade != library);
            plan.insert(0, library);
        }
        plan
    }

    fn build_seconds(&self, upgrade: &BuildingUpgrade) -> u64 {
        self.catalog
            .level(upgrade.kind, upgrade.to_level)
            .map_or(u64::MAX, |data| data.build_time_seconds)
    }

    /// Withhold wood and stone producers that ran too far ahead of the ore
    /// mine, as long as the ore mine can still be upgraded.
    fn apply_lead(&self, state: &SimulationState, productive: &mut Vec<(BuildingUpgrade, f64)>) {
        let Some(lead) = self.options.lead else {
            return;
        };
        if !productive
            .iter()
            .any(|(upgrade, _)| upgrade.kind == BuildingKind::OreMine)
        {
            return;
        }
        let ore = state.level(BuildingKind::OreMine);
        productive.retain(|(upgrade, _)| match upgrade.kind {
            BuildingKind::Lumberjack => upgrade.from_level < ore + lead.wood_lead + 1,
            BuildingKind::Quarry => upgrade.from_level < ore + lead.quarry_lead + 1,
            _ => true,
        });
    }

    fn next_library(&self, state: &SimulationState) -> Option<BuildingUpgrade> {
        let current = state.level(BuildingKind::Library);
        self.catalog
            .level(BuildingKind::Library, current + 1)
            .map(|_| BuildingUpgrade::next(BuildingKind::Library, current))
    }

    fn library_for_target_technologies(&self, state: &SimulationState) -> Option<BuildingUpgrade> {
        let library = state.level(BuildingKind::Library);
        let gated = self.targets.technologies.iter().any(|name| {
            !state.is_researched(name)
                && self
                    .catalog
                    .technology(name)
                    .is_some_and(|tech| library < tech.required_library_level)
        });
        if gated {
            self.next_library(state)
        } else {
            None
        }
    }

    fn library_for_production_tech(
        &self,
        state: &SimulationState,
        best: Option<&BuildingUpgrade>,
    ) -> Option<BuildingUpgrade> {
        let best = best?;
        let (tech, tech_roi) = self.best_production_tech(state)?;
        if state.level(BuildingKind::Library) >= tech.required_library_level {
            return None;
        }
        if tech_roi <= self.building_roi(state, best) {
            return None;
        }
        self.next_library(state)
    }

    // ========================================================================
    // Research queue
    // ========================================================================

    fn researchable(&self, state: &SimulationState, name: &str) -> Option<&'a TechData> {
        if state.is_researched(name) {
            return None;
        }
        let catalog: &'a Catalog = self.catalog;
        catalog
            .technology(name)
            .filter(|tech| state.level(BuildingKind::Library) >= tech.required_library_level)
    }

    /// Technology the research queue should take next.
    ///
    /// Technologies blocking a target building level come first, scanning
    /// building kinds in declaration order and levels ascending. Then
    /// explicitly targeted technologies, then production technologies.
    #[must_use]
    pub fn pick_research(&self, state: &SimulationState) -> Option<&'a TechData> {
        for kind in BuildingKind::ALL {
            let Some(target) = self.targets.building(kind) else {
                continue;
            };
            for level in state.level(kind) + 1..=target {
                if let Some(tech) = self
                    .catalog
                    .tech_for_level(kind, level)
                    .and_then(|name| self.researchable(state, name))
                {
                    return Some(tech);
                }
            }
        }

        if let Some(tech) = self
            .targets
            .technologies
            .iter()
            .find_map(|name| self.researchable(state, name))
        {
            return Some(tech);
        }

        PRODUCTION_TECHNOLOGIES
            .into_iter()
            .find_map(|name| self.researchable(state, name))
    }

    // ========================================================================
    // Training queue
    // ========================================================================

    fn trainable(&self, state: &SimulationState, kind: UnitKind) -> bool {
        let unit = self.catalog.unit(kind);
        let unlocked = unit
            .technology
            .as_deref()
            .map_or(true, |name| state.is_researched(name));
        unlocked && state.can_afford_food(unit.food())
    }

    /// Unit the training queue should take next.
    #[must_use]
    pub fn pick_training(&self, state: &SimulationState) -> Option<UnitKind> {
        if !self.army_phase(state) {
            return None;
        }
        if state.level(BuildingKind::Arsenal) < 1
            || state.food_headroom() < self.options.min_food_headroom
        {
            return None;
        }

        for (kind, count) in self.targets.units.iter() {
            if Self::owned_units(state, kind) < count && self.trainable(state, kind) {
                return Some(kind);
            }
        }

        let tavern = state.level(BuildingKind::Tavern);
        let mut missions: Vec<(f64, usize)> = self
            .catalog
            .missions()
            .iter()
            .enumerate()
            .filter(|(_, mission)| mission.available_at(tavern))
            .map(|(index, mission)| (mission_roi(mission), index))
            .filter(|(roi, _)| *roi > 0.0)
            .collect();
        missions.sort_by(|(a, ia), (b, ib)| {
            b.partial_cmp(a).unwrap_or(Ordering::Equal).then(ia.cmp(ib))
        });

        let all_missions = self.catalog.missions();
        for (_, index) in missions {
            for req in &all_missions[index].units_required {
                if Self::owned_units(state, req.kind) < req.count && self.trainable(state, req.kind)
                {
                    return Some(req.kind);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialState;
    use crate::data::{BuildingData, BuildingLevelData, MissionData, RewardRange, UnitRequirement};
    use crate::resources::{Costs, Resource};
    use crate::strategy::ResourceStrategy;

    fn level(seconds: u64, rate: Option<f64>, capacity: Option<u32>) -> BuildingLevelData {
        BuildingLevelData {
            costs: Costs::new(10, 10, 10, 0),
            build_time_seconds: seconds,
            production_rate: rate,
            storage_capacity: capacity,
        }
    }

    fn producer(kind: BuildingKind) -> BuildingData {
        (1..=5).fold(BuildingData::new(kind, 5), |data, n| {
            data.with_level(n, level(600, Some(f64::from(n) * 10.0), None))
        })
    }

    fn plain(kind: BuildingKind, seconds: u64) -> BuildingData {
        (1..=5).fold(BuildingData::new(kind, 5), |data, n| {
            data.with_level(n, level(seconds * u64::from(n), None, None))
        })
    }

    fn catalog() -> Catalog {
        Catalog::new()
            .with_building(producer(BuildingKind::Lumberjack))
            .with_building(producer(BuildingKind::Quarry))
            .with_building(producer(BuildingKind::OreMine))
            .with_building(plain(BuildingKind::Keep, 100))
            .with_building(plain(BuildingKind::Market, 50))
            .with_building(plain(BuildingKind::Library, 300))
            .with_building(plain(BuildingKind::Arsenal, 60))
            .with_building(
                BuildingData::new(BuildingKind::Farm, 1).with_level(1, level(0, None, Some(40))),
            )
            .with_technology(TechData::new("Longbow", Costs::ZERO, 60).with_library_level(2))
            .with_technology(TechData::new("Wheelbarrow", Costs::ZERO, 60))
    }

    fn plan(catalog: &Catalog, targets: &Targets, options: &SolverOptions) -> Vec<BuildingKind> {
        let planner = Planner::new(catalog, targets, options);
        let state = SimulationState::new(&InitialState::default(), catalog);
        planner
            .building_plan(&state)
            .into_iter()
            .map(|upgrade| upgrade.kind)
            .collect()
    }

    #[test]
    fn test_productive_candidates_rank_by_roi() {
        let catalog = catalog();
        let targets = Targets::none()
            .with_building(BuildingKind::OreMine, 5)
            .with_building(BuildingKind::Lumberjack, 5)
            .with_building(BuildingKind::Keep, 5);
        let options = SolverOptions::default();

        // Wood and iron gain the same; wood is scarcer. The keep waits.
        assert_eq!(
            plan(&catalog, &targets, &options),
            vec![BuildingKind::Lumberjack, BuildingKind::OreMine]
        );
    }

    #[test]
    fn test_equal_roi_breaks_ties_by_name() {
        let catalog = catalog();
        let targets = Targets::none()
            .with_building(BuildingKind::Quarry, 5)
            .with_building(BuildingKind::Lumberjack, 5);
        let options = SolverOptions::default();

        assert_eq!(
            plan(&catalog, &targets, &options),
            vec![BuildingKind::Lumberjack, BuildingKind::Quarry]
        );
    }

    #[test]
    fn test_zero_roi_candidates_rank_by_build_time() {
        let catalog = catalog();
        let targets = Targets::none()
            .with_building(BuildingKind::Keep, 5)
            .with_building(BuildingKind::Market, 5)
            .with_building(BuildingKind::Lumberjack, 1);
        let options = SolverOptions::default();

        assert_eq!(
            plan(&catalog, &targets, &options),
            vec![BuildingKind::Market, BuildingKind::Keep]
        );
    }

    #[test]
    fn test_lead_withholds_runaway_producers() {
        let catalog = catalog();
        let targets = Targets::none()
            .with_building(BuildingKind::OreMine, 5)
            .with_building(BuildingKind::Lumberjack, 5);
        let options = SolverOptions {
            lead: Some(ResourceStrategy::new(0, 0)),
            ..SolverOptions::default()
        };
        let planner = Planner::new(&catalog, &targets, &options);
        let initial = InitialState::default().with_level(BuildingKind::Lumberjack, 2);
        let state = SimulationState::new(&initial, &catalog);

        let kinds: Vec<_> = planner
            .building_plan(&state)
            .into_iter()
            .map(|u| u.kind)
            .collect();
        assert_eq!(kinds, vec![BuildingKind::OreMine]);
    }

    #[test]
    fn test_target_technology_adds_library() {
        let catalog = catalog();
        let targets = Targets::none().with_technology("Longbow");
        let options = SolverOptions::default();

        assert_eq!(
            plan(&catalog, &targets, &options),
            vec![BuildingKind::Library]
        );
    }

    #[test]
    fn test_research_prefers_blocking_technology() {
        let catalog = catalog()
            .with_building(
                plain(BuildingKind::Keep, 100).with_tech_prerequisite(3, "Longbow"),
            )
            .with_technology(TechData::new("Beer tester", Costs::ZERO, 60));
        let targets = Targets::none().with_building(BuildingKind::Keep, 3);
        let options = SolverOptions::default();
        let planner = Planner::new(&catalog, &targets, &options);

        let state = SimulationState::new(&InitialState::default(), &catalog);
        // Longbow needs library 2; production technologies come next.
        assert_eq!(planner.pick_research(&state).unwrap().name, "Beer tester");

        let initial = InitialState::default().with_level(BuildingKind::Library, 2);
        let state = SimulationState::new(&initial, &catalog);
        assert_eq!(planner.pick_research(&state).unwrap().name, "Longbow");
    }

    #[test]
    fn test_training_waits_for_building_targets() {
        let catalog = catalog().with_missions(vec![MissionData {
            name: "Scout".to_string(),
            tavern_level: 1,
            max_tavern_level: 0,
            duration_minutes: 30,
            units_required: vec![
                UnitRequirement {
                    kind: UnitKind::Archer,
                    count: 2,
                },
                UnitRequirement {
                    kind: UnitKind::Spearman,
                    count: 3,
                },
            ],
            resource_costs: Costs::ZERO,
            rewards: vec![RewardRange {
                resource: Resource::Iron,
                min: 50,
                max: 70,
            }],
        }]);
        let targets = Targets::none().with_building(BuildingKind::Keep, 2);
        let options = SolverOptions::default();
        let planner = Planner::new(&catalog, &targets, &options);
        let state = SimulationState::new(&InitialState::default(), &catalog);
        assert_eq!(planner.pick_training(&state), None);

        let eager = SolverOptions {
            train_during_build: true,
            ..SolverOptions::default()
        };
        let planner = Planner::new(&catalog, &targets, &eager);
        // Archers need Longbow; spearmen do not.
        assert_eq!(planner.pick_training(&state), Some(UnitKind::Spearman));

        let mut state = state;
        state.food_used = 31;
        assert_eq!(planner.pick_training(&state), None);
    }

    #[test]
    fn test_explicit_unit_targets_train_first() {
        let catalog = catalog();
        let targets = Targets::none().with_units(UnitKind::Horseman, 1);
        let options = SolverOptions::default();
        let planner = Planner::new(&catalog, &targets, &options);
        let mut state = SimulationState::new(&InitialState::default(), &catalog);

        assert_eq!(planner.pick_training(&state), Some(UnitKind::Horseman));
        assert!(!planner.all_targets_reached(&state));

        state.on_mission.add(UnitKind::Horseman, 1);
        assert_eq!(planner.pick_training(&state), None);
        assert!(planner.all_targets_reached(&state));
    }
}
