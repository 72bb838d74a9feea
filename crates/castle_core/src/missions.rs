//! Tavern missions: choosing, dispatching and returning.

use crate::buildings::BuildingKind;
use crate::catalog::Catalog;
use crate::data::MissionData;
use crate::decision::Planner;
use crate::resources::{PerResource, Resource};
use crate::roi::mission_roi;
use crate::state::{RunningMission, SimulationState};

impl Planner<'_> {
    /// Index of the best mission that could start now, ignoring resources.
    ///
    /// A mission qualifies when the tavern level is in its range, it is not
    /// already running, and the units at home can staff it. Only missions
    /// with a positive ROI are considered; ties keep catalog order. Nothing
    /// is sent out while building targets are still open, unless training
    /// during the build is enabled.
    #[must_use]
    pub fn pick_mission(&self, state: &SimulationState) -> Option<usize> {
        if !self.army_phase(state) {
            return None;
        }
        let tavern = state.level(BuildingKind::Tavern);
        let mut best: Option<(usize, f64)> = None;

        for (index, mission) in self.catalog.missions().iter().enumerate() {
            if !mission.available_at(tavern)
                || state.is_mission_running(&mission.name)
                || !mission.staffed_by(&state.army)
            {
                continue;
            }
            let roi = mission_roi(mission);
            if roi > best.map_or(0.0, |(_, score)| score) {
                best = Some((index, roi));
            }
        }
        best.map(|(index, _)| index)
    }
}

impl SimulationState {
    /// Whether a mission with this name is away.
    #[must_use]
    pub fn is_mission_running(&self, name: &str) -> bool {
        self.running_missions.iter().any(|m| m.name == name)
    }

    /// Pay for a mission and send its units away.
    pub fn start_mission(&mut self, index: usize, mission: &MissionData) -> RunningMission {
        self.economy.spend(&mission.resource_costs);

        let units = mission.required_army();
        for (kind, count) in units.iter() {
            self.army.remove(kind, count);
            self.on_mission.add(kind, count);
        }

        let running = RunningMission {
            id: self.next_mission_id(),
            mission: index,
            name: mission.name.clone(),
            start: self.now,
            end: self.now + mission.duration_seconds(),
            units,
        };
        self.running_missions.push(running.clone());
        running
    }

    /// Bring a mission home, crediting its average rewards.
    ///
    /// Returns the finished mission and the amount credited per resource
    /// before caps were applied, or `None` for an unknown id.
    pub fn complete_mission(
        &mut self,
        id: u64,
        catalog: &Catalog,
    ) -> Option<(RunningMission, PerResource<f64>)> {
        let position = self.running_missions.iter().position(|m| m.id == id)?;
        let running = self.running_missions.remove(position);

        let rewards = catalog
            .missions()
            .get(running.mission)
            .map_or(PerResource::splat(0.0), MissionData::average_rewards);
        for resource in Resource::ALL {
            if rewards[resource] > 0.0 {
                self.economy.credit(resource, rewards[resource]);
            }
        }

        for (kind, count) in running.units.iter() {
            self.on_mission.remove(kind, count);
            self.army.add(kind, count);
        }
        Some((running, rewards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialState, Targets};
    use crate::data::{RewardRange, UnitRequirement};
    use crate::resources::Costs;
    use crate::solver::SolverOptions;
    use crate::units::UnitKind;

    fn mission(name: &str, tavern_level: u32, reward: u32, spearmen: u32) -> MissionData {
        MissionData {
            name: name.to_string(),
            tavern_level,
            max_tavern_level: 0,
            duration_minutes: 60,
            units_required: vec![UnitRequirement {
                kind: UnitKind::Spearman,
                count: spearmen,
            }],
            resource_costs: Costs::new(20, 0, 0, 0),
            rewards: vec![RewardRange {
                resource: Resource::Stone,
                min: reward,
                max: reward + 20,
            }],
        }
    }

    fn catalog() -> Catalog {
        Catalog::new().with_missions(vec![
            mission("Patrol", 1, 100, 2),
            mission("Raid", 1, 300, 4),
            mission("Siege", 3, 900, 1),
            mission("Chores", 1, 0, 1),
        ])
    }

    fn state_with(catalog: &Catalog, spearmen: u32) -> SimulationState {
        let mut initial = InitialState::default();
        initial.army.add(UnitKind::Spearman, spearmen);
        SimulationState::new(&initial, catalog)
    }

    #[test]
    fn test_pick_best_staffed_mission() {
        let catalog = catalog();
        let targets = Targets::none();
        let options = SolverOptions::default();
        let planner = Planner::new(&catalog, &targets, &options);

        let name = |state: &SimulationState| {
            planner
                .pick_mission(state)
                .map(|i| catalog.missions()[i].name.clone())
        };

        assert_eq!(name(&state_with(&catalog, 0)), None);
        assert_eq!(name(&state_with(&catalog, 2)).as_deref(), Some("Patrol"));
        // Siege pays more but needs tavern 3.
        assert_eq!(name(&state_with(&catalog, 4)).as_deref(), Some("Raid"));
    }

    #[test]
    fn test_running_mission_is_not_picked_twice() {
        let catalog = catalog();
        let targets = Targets::none();
        let options = SolverOptions::default();
        let planner = Planner::new(&catalog, &targets, &options);
        let mut state = state_with(&catalog, 8);

        let raid = planner.pick_mission(&state).unwrap();
        state.start_mission(raid, &catalog.missions()[raid]);
        let next = planner.pick_mission(&state).unwrap();
        assert_eq!(catalog.missions()[next].name, "Patrol");
    }

    #[test]
    fn test_no_missions_while_building_targets_open() {
        let catalog = catalog();
        let targets = Targets::none().with_building(BuildingKind::Lumberjack, 5);
        let state = state_with(&catalog, 8);

        let options = SolverOptions::default();
        let planner = Planner::new(&catalog, &targets, &options);
        assert_eq!(planner.pick_mission(&state), None);

        let options = SolverOptions {
            train_during_build: true,
            ..SolverOptions::default()
        };
        let planner = Planner::new(&catalog, &targets, &options);
        assert!(planner.pick_mission(&state).is_some());
    }

    #[test]
    fn test_start_and_complete_round_trip() {
        let catalog = catalog();
        let mut state = state_with(&catalog, 3);
        let patrol = &catalog.missions()[1];
        assert_eq!(patrol.name, "Patrol");

        let running = state.start_mission(1, patrol);
        assert_eq!(running.end, 3600);
        assert_eq!(state.army.get(UnitKind::Spearman), 1);
        assert_eq!(state.on_mission.get(UnitKind::Spearman), 2);
        assert_eq!(state.economy.stock[Resource::Wood], 100.0);
        assert!(state.is_mission_running("Patrol"));

        let (done, rewards) = state.complete_mission(running.id, &catalog).unwrap();
        assert_eq!(done.name, "Patrol");
        assert_eq!(rewards[Resource::Stone], 110.0);
        assert_eq!(state.economy.stock[Resource::Stone], 230.0);
        assert_eq!(state.army.get(UnitKind::Spearman), 3);
        assert!(state.on_mission.is_empty());
        assert!(state.complete_mission(running.id, &catalog).is_none());
    }
}
