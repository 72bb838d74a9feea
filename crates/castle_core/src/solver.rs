//! The event-driven scheduling loop.
//!
//! A run starts with a single state-changed event at t=0. Processing that
//! event fills every idle queue and schedules one wake-up for the moment the
//! next pick becomes affordable. Completions re-trigger the decision step.
//! The loop ends when every target is reached, nothing is left to happen,
//! or the iteration ceiling is hit.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actions::{BuildingUpgrade, QueueKind};
use crate::buildings::BuildingKind;
use crate::catalog::Catalog;
use crate::config::{InitialState, Targets};
use crate::data::TechData;
use crate::decision::Planner;
use crate::economy::Wait;
use crate::events::{EventKind, EventQueue};
use crate::prerequisites::Resolution;
use crate::resources::Costs;
use crate::roi::ScarcityModel;
use crate::schedule::{
    BuildingRecord, MissionRecord, ResearchRecord, Schedule, TrainingRecord, UnmetTarget,
};
use crate::state::SimulationState;
use crate::strategy::ResourceStrategy;
use crate::units::UnitKind;

/// Default cap on processed events.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;

/// Default population headroom required before training.
pub const DEFAULT_MIN_FOOD_HEADROOM: u32 = 10;

/// Tuning knobs of a run.
///
/// # Example RON
///
/// ```ron
/// SolverOptions(
///     max_iterations: 1000000,
///     scarcity: fixed,
///     train_during_build: false,
///     research_remaining: true,
///     min_food_headroom: 10,
///     lead: None,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Main-loop event ceiling.
    pub max_iterations: u64,
    /// Demand model for producer scoring.
    pub scarcity: ScarcityModel,
    /// Allow training before every building target is reached.
    pub train_during_build: bool,
    /// Research every leftover technology once targets are reached.
    pub research_remaining: bool,
    /// Free population required before training starts.
    pub min_food_headroom: u32,
    /// Producer lead limits; `None` leaves producers unconstrained.
    pub lead: Option<ResourceStrategy>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            scarcity: ScarcityModel::Fixed,
            train_during_build: false,
            research_remaining: true,
            min_food_headroom: DEFAULT_MIN_FOOD_HEADROOM,
            lead: None,
        }
    }
}

/// Deterministic build-order solver.
///
/// Holds only shared references, so one catalog can back any number of
/// concurrent runs.
#[derive(Debug, Clone, Copy)]
pub struct Solver<'a> {
    /// Static game data.
    pub catalog: &'a Catalog,
    /// What each run should reach.
    pub targets: &'a Targets,
    /// Tuning knobs.
    pub options: &'a SolverOptions,
}

impl<'a> Solver<'a> {
    /// Create a solver over a catalog.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, targets: &'a Targets, options: &'a SolverOptions) -> Self {
        Self {
            catalog,
            targets,
            options,
        }
    }

    /// Simulate from `initial` and return the timed schedule.
    ///
    /// Infeasible targets never fail the call; they show up as
    /// `completed == false` with the missing targets listed.
    #[must_use]
    pub fn solve(&self, initial: &InitialState) -> Schedule {
        let planner = Planner::new(self.catalog, self.targets, self.options);
        let mut run = Run::new(planner, SimulationState::new(initial, self.catalog));
        run.execute();
        let mut schedule = run.finish();
        schedule.strategy = self.options.lead;
        schedule
    }
}

// ============================================================================
// A single run
// ============================================================================

/// Bookkeeping for an action in flight.
#[derive(Debug, Clone, Copy)]
struct Started {
    start: u64,
    costs: Costs,
    food_used: u32,
}

struct Run<'a> {
    planner: Planner<'a>,
    state: SimulationState,
    events: EventQueue,
    building: Option<Started>,
    research: Option<Started>,
    training: Option<Started>,
    buildings: Vec<BuildingRecord>,
    research_log: Vec<ResearchRecord>,
    training_log: Vec<TrainingRecord>,
    missions: Vec<MissionRecord>,
    iterations: u64,
    hit_iteration_limit: bool,
}

impl<'a> Run<'a> {
    fn new(planner: Planner<'a>, state: SimulationState) -> Self {
        Self {
            planner,
            state,
            events: EventQueue::new(),
            building: None,
            research: None,
            training: None,
            buildings: Vec::new(),
            research_log: Vec::new(),
            training_log: Vec::new(),
            missions: Vec::new(),
            iterations: 0,
            hit_iteration_limit: false,
        }
    }

    fn catalog(&self) -> &'a Catalog {
        self.planner.catalog
    }

    fn execute(&mut self) {
        let max_iterations = self.planner.options.max_iterations;
        self.events.push(0, EventKind::StateChanged);

        while !self.planner.all_targets_reached(&self.state) {
            if self.iterations >= max_iterations {
                self.hit_iteration_limit = true;
                warn!(
                    "Iteration ceiling {} hit at t={}s with {} events pending",
                    max_iterations,
                    self.state.now,
                    self.events.len()
                );
                break;
            }
            let Some(event) = self.events.pop() else {
                break;
            };
            self.iterations += 1;
            self.state.advance_to(event.time);
            self.process(event.kind);
        }

        // Let everything already running finish.
        while let Some(event) = self.events.pop() {
            if event.kind.is_state_changed() {
                continue;
            }
            self.state.advance_to(event.time);
            self.process(event.kind);
        }

        if self.planner.options.research_remaining {
            self.research_remaining();
        }
    }

    fn process(&mut self, kind: EventKind) {
        match kind {
            EventKind::MissionComplete { mission_id } => self.on_mission_complete(mission_id),
            EventKind::BuildingComplete(upgrade) => self.on_building_complete(upgrade),
            EventKind::ResearchComplete { technology } => self.on_research_complete(&technology),
            EventKind::TrainingComplete { unit } => self.on_training_complete(unit),
            EventKind::StateChanged => self.on_state_changed(),
        }

        #[cfg(feature = "debug-validation")]
        self.validate_state();
    }

    #[cfg(feature = "debug-validation")]
    fn validate_state(&self) {
        for (resource, amount) in self.state.economy.stock.iter() {
            debug_assert!(amount >= 0.0, "{resource} stock went negative: {amount}");
            if let Some(cap) = self.state.economy.caps[resource] {
                debug_assert!(amount <= f64::from(cap), "{resource} stock above cap");
            }
        }
    }

    fn wake(&mut self) {
        self.events
            .push_if_absent(self.state.now, EventKind::StateChanged);
    }

    // ========================================================================
    // Completion handlers
    // ========================================================================

    fn on_mission_complete(&mut self, id: u64) {
        let catalog = self.catalog();
        let Some((running, rewards)) = self.state.complete_mission(id, catalog) else {
            warn!("Completion for unknown mission id {}", id);
            return;
        };
        let costs = catalog
            .missions()
            .get(running.mission)
            .map_or(Costs::ZERO, |m| m.resource_costs);
        debug!("t={}: mission {} returned", self.state.now, running.name);
        self.missions.push(MissionRecord {
            name: running.name,
            start: running.start,
            end: running.end,
            costs,
            units: running.units,
            rewards,
        });
        self.wake();
    }

    fn on_building_complete(&mut self, upgrade: BuildingUpgrade) {
        let catalog = self.catalog();
        self.state.levels[upgrade.kind] = upgrade.to_level;
        self.state.apply_level_effects(upgrade.kind, catalog);
        self.state.building_in_progress = None;

        let started = self.building.take();
        let (start, costs, food_used) = started.map_or(
            (self.state.now, Costs::ZERO, self.state.food_used),
            |s| (s.start, s.costs, s.food_used),
        );
        debug!("t={}: {} complete", self.state.now, upgrade);
        self.buildings.push(BuildingRecord {
            upgrade,
            start,
            end: self.state.now,
            costs,
            food_used,
            food_capacity: self.state.food_capacity,
        });
        self.wake();
    }

    fn on_research_complete(&mut self, technology: &str) {
        self.state.mark_researched(technology);
        self.state.research_in_progress = None;

        let started = self.research.take();
        let (start, costs, food_used) = started.map_or(
            (self.state.now, Costs::ZERO, self.state.food_used),
            |s| (s.start, s.costs, s.food_used),
        );
        debug!("t={}: research {} complete", self.state.now, technology);
        self.research_log.push(ResearchRecord {
            technology: technology.to_string(),
            start,
            end: self.state.now,
            costs,
            food_used,
            food_capacity: self.state.food_capacity,
        });
        self.wake();
    }

    fn on_training_complete(&mut self, unit: UnitKind) {
        self.state.army.add(unit, 1);
        self.state.training_in_progress = None;

        let started = self.training.take();
        let (start, costs, food_used) = started.map_or(
            (self.state.now, Costs::ZERO, self.state.food_used),
            |s| (s.start, s.costs, s.food_used),
        );
        self.training_log.push(TrainingRecord {
            unit,
            start,
            end: self.state.now,
            costs,
            food_used,
            food_capacity: self.state.food_capacity,
        });
        self.wake();
    }

    // ========================================================================
    // Decisions
    // ========================================================================

    fn on_state_changed(&mut self) {
        if self.state.is_idle(QueueKind::Building) {
            self.try_start_building();
        }

        if self.state.is_idle(QueueKind::Research) {
            if let Some(tech) = self.planner.pick_research(&self.state) {
                self.try_start_research(tech);
            }
        }

        if self.state.is_idle(QueueKind::Training) {
            if let Some(unit) = self.planner.pick_training(&self.state) {
                self.try_start_training(unit);
            }
        }

        self.start_missions();
        self.schedule_wake_up();
    }

    fn try_start_building(&mut self) {
        let catalog = self.catalog();
        for candidate in self.planner.building_plan(&self.state) {
            match self.planner.resolve(&self.state, candidate) {
                Resolution::Blocked => {}
                Resolution::Research(name) => {
                    if self.state.is_idle(QueueKind::Research) {
                        if let Some(tech) = catalog.technology(&name) {
                            debug!(
                                "t={}: {} waits for {}",
                                self.state.now, candidate, tech.name
                            );
                            self.try_start_research(tech);
                        }
                    }
                }
                Resolution::Build(upgrade) => {
                    let Some(data) = catalog.level(upgrade.kind, upgrade.to_level) else {
                        continue;
                    };
                    if self.state.economy.can_afford(&data.costs)
                        && self.state.can_afford_food(data.costs.food)
                    {
                        self.start_building(upgrade, data.costs, data.build_time_seconds);
                        return;
                    }
                }
            }
        }
    }

    fn start_building(&mut self, upgrade: BuildingUpgrade, costs: Costs, seconds: u64) {
        let now = self.state.now;
        self.state.economy.spend(&costs);
        self.state.food_used += costs.food;
        self.state.building_free_at = now + seconds;
        self.state.building_in_progress = Some(upgrade);
        self.building = Some(Started {
            start: now,
            costs,
            food_used: self.state.food_used,
        });
        self.events
            .push(now + seconds, EventKind::BuildingComplete(upgrade));
        debug!("t={}: start {} ({}s)", now, upgrade, seconds);
    }

    /// Start a research if it is affordable now. Returns whether it started.
    fn try_start_research(&mut self, tech: &TechData) -> bool {
        if !self.state.is_idle(QueueKind::Research)
            || !self.state.economy.can_afford(&tech.costs)
            || !self.state.can_afford_food(tech.costs.food)
        {
            return false;
        }
        let now = self.state.now;
        let end = now + tech.research_time_seconds;
        self.state.economy.spend(&tech.costs);
        self.state.food_used += tech.costs.food;
        self.state.research_free_at = end;
        self.state.research_in_progress = Some(tech.name.clone());
        self.research = Some(Started {
            start: now,
            costs: tech.costs,
            food_used: self.state.food_used,
        });
        self.events.push(
            end,
            EventKind::ResearchComplete {
                technology: tech.name.clone(),
            },
        );
        debug!("t={}: start research {} ({}s)", now, tech.name, tech.research_time_seconds);
        true
    }

    fn try_start_training(&mut self, unit: UnitKind) {
        let data = self.catalog().unit(unit);
        if !self.state.economy.can_afford(&data.costs) || !self.state.can_afford_food(data.food())
        {
            return;
        }
        let now = self.state.now;
        let end = now + data.training_time_seconds;
        self.state.economy.spend(&data.costs);
        self.state.food_used += data.food();
        self.state.training_free_at = end;
        self.state.training_in_progress = Some(unit);
        self.training = Some(Started {
            start: now,
            costs: data.costs,
            food_used: self.state.food_used,
        });
        self.events.push(end, EventKind::TrainingComplete { unit });
        debug!("t={}: start training {}", now, unit);
    }

    fn start_missions(&mut self) {
        let catalog = self.catalog();
        while let Some(index) = self.planner.pick_mission(&self.state) {
            let mission = &catalog.missions()[index];
            if !self.state.economy.can_afford(&mission.resource_costs) {
                break;
            }
            let running = self.state.start_mission(index, mission);
            self.events.push(
                running.end,
                EventKind::MissionComplete {
                    mission_id: running.id,
                },
            );
            debug!("t={}: mission {} departs", self.state.now, mission.name);
        }
    }

    /// Schedule a state-changed event for when the next pick of any idle
    /// queue becomes affordable.
    fn schedule_wake_up(&mut self) {
        let catalog = self.catalog();
        let mut waits: Vec<Wait> = Vec::new();

        if self.state.is_idle(QueueKind::Building) {
            for candidate in self.planner.building_plan(&self.state) {
                match self.planner.resolve(&self.state, candidate) {
                    Resolution::Blocked => {}
                    Resolution::Research(name) => {
                        if let Some(tech) = catalog.technology(&name) {
                            if self.state.is_idle(QueueKind::Research) {
                                waits.push(self.state.economy.wait_for(&tech.costs));
                            }
                        }
                    }
                    // Any buildable candidate may be the one started, so
                    // wake for whichever becomes affordable first.
                    Resolution::Build(upgrade) => {
                        if let Some(data) = catalog.level(upgrade.kind, upgrade.to_level) {
                            waits.push(self.state.economy.wait_for(&data.costs));
                        }
                    }
                }
            }
        }
        if self.state.is_idle(QueueKind::Research) {
            if let Some(tech) = self.planner.pick_research(&self.state) {
                waits.push(self.state.economy.wait_for(&tech.costs));
            }
        }
        if self.state.is_idle(QueueKind::Training) {
            if let Some(unit) = self.planner.pick_training(&self.state) {
                waits.push(self.state.economy.wait_for(&catalog.unit(unit).costs));
            }
        }

        let earliest = waits
            .into_iter()
            .filter_map(|wait| match wait {
                Wait::After(seconds) => Some(seconds),
                Wait::Ready | Wait::Never => None,
            })
            .min();
        if let Some(seconds) = earliest {
            let at = self.state.now + seconds;
            if self.events.push_if_absent(at, EventKind::StateChanged) {
                debug!("t={}: wake-up scheduled at {}", self.state.now, at);
            }
        }
    }

    // ========================================================================
    // Wrap-up
    // ========================================================================

    /// Research every technology still unknown, cheapest library gate first.
    fn research_remaining(&mut self) {
        let catalog = self.catalog();
        let mut remaining: Vec<&TechData> = catalog
            .technologies()
            .filter(|tech| !self.state.is_researched(&tech.name))
            .collect();
        remaining.sort_by(|a, b| {
            a.required_library_level
                .cmp(&b.required_library_level)
                .then_with(|| a.name.cmp(&b.name))
        });

        let library = self.state.level(BuildingKind::Library);
        // A technology counts, and its bonus applies, only from its end time.
        let mut pending: Option<&str> = None;
        for tech in remaining {
            if library < tech.required_library_level {
                continue;
            }
            if self.state.now < self.state.research_free_at {
                self.state.advance_to(self.state.research_free_at);
            }
            if let Some(name) = pending.take() {
                self.state.mark_researched(name);
            }
            match self.state.economy.wait_for(&tech.costs) {
                Wait::Never => continue,
                Wait::After(seconds) => self.state.advance_to(self.state.now + seconds),
                Wait::Ready => {}
            }
            if !self.state.economy.can_afford(&tech.costs)
                || !self.state.can_afford_food(tech.costs.food)
            {
                continue;
            }

            let start = self.state.now;
            self.state.economy.spend(&tech.costs);
            self.state.food_used += tech.costs.food;
            self.state.research_free_at = start + tech.research_time_seconds;
            pending = Some(&tech.name);
            debug!("t={}: research {} after targets", start, tech.name);
            self.research_log.push(ResearchRecord {
                technology: tech.name.clone(),
                start,
                end: self.state.research_free_at,
                costs: tech.costs,
                food_used: self.state.food_used,
                food_capacity: self.state.food_capacity,
            });
        }
        if let Some(name) = pending {
            self.state.mark_researched(name);
        }
    }

    fn unmet_targets(&self) -> Vec<UnmetTarget> {
        let targets = self.planner.targets;
        let mut unmet = Vec::new();
        for kind in BuildingKind::ALL {
            if let Some(target) = targets.building(kind) {
                let reached = self.state.level(kind);
                if reached < target {
                    unmet.push(UnmetTarget::Building {
                        kind,
                        reached,
                        target,
                    });
                }
            }
        }
        for name in &targets.technologies {
            if !self.state.is_researched(name) {
                unmet.push(UnmetTarget::Technology { name: name.clone() });
            }
        }
        for (unit, target) in targets.units.iter() {
            let reached = Planner::owned_units(&self.state, unit);
            if reached < target {
                unmet.push(UnmetTarget::Units {
                    unit,
                    reached,
                    target,
                });
            }
        }
        unmet
    }

    fn finish(self) -> Schedule {
        let unmet_targets = self.unmet_targets();
        let total_time_seconds = self
            .state
            .now
            .max(self.state.building_free_at)
            .max(self.state.research_free_at);

        Schedule {
            buildings: self.buildings,
            research: self.research_log,
            training: self.training_log,
            missions: self.missions,
            total_time_seconds,
            final_state: self.state.snapshot(),
            completed: unmet_targets.is_empty(),
            unmet_targets,
            iterations: self.iterations,
            hit_iteration_limit: self.hit_iteration_limit,
            strategy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BuildingData, BuildingLevelData};
    use crate::resources::Resource;

    fn level(costs: Costs, seconds: u64, rate: Option<f64>) -> BuildingLevelData {
        BuildingLevelData {
            costs,
            build_time_seconds: seconds,
            production_rate: rate,
            storage_capacity: None,
        }
    }

    fn catalog() -> Catalog {
        let lumberjack = (1..=5).fold(BuildingData::new(BuildingKind::Lumberjack, 5), |b, n| {
            b.with_level(
                n,
                level(Costs::new(50, 0, 0, 1), 600, Some(f64::from(n) * 100.0)),
            )
        });
        let keep = (1..=3).fold(BuildingData::new(BuildingKind::Keep, 3), |b, n| {
            b.with_level(n, level(Costs::new(0, 0, 32, 0), 300, None))
        });
        let farm = BuildingData::new(BuildingKind::Farm, 1).with_level(
            1,
            BuildingLevelData {
                storage_capacity: Some(40),
                ..level(Costs::ZERO, 0, None)
            },
        );
        Catalog::new()
            .with_building(lumberjack)
            .with_building(keep)
            .with_building(farm)
    }

    #[test]
    fn test_reaches_simple_target() {
        let catalog = catalog();
        let targets = Targets::none().with_building(BuildingKind::Lumberjack, 4);
        let options = SolverOptions::default();
        let schedule = Solver::new(&catalog, &targets, &options).solve(&InitialState::default());

        assert!(schedule.completed);
        assert_eq!(schedule.buildings.len(), 3);
        assert_eq!(schedule.buildings[0].start, 0);
        for pair in schedule.buildings.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert_eq!(pair[0].upgrade.to_level + 1, pair[1].upgrade.to_level);
        }
        assert_eq!(schedule.final_state.levels[BuildingKind::Lumberjack], 4);
        assert_eq!(schedule.final_state.food_used, 3);
        assert_eq!(schedule.total_time_seconds, schedule.buildings[2].end);
    }

    #[test]
    fn test_unreachable_target_terminates_incomplete() {
        let catalog = catalog();
        let targets = Targets::none().with_building(BuildingKind::Keep, 3);
        let options = SolverOptions::default();
        let initial = InitialState::default().with_stock(Resource::Iron, 0.0);
        let schedule = Solver::new(&catalog, &targets, &options).solve(&initial);

        assert!(!schedule.completed);
        assert!(!schedule.hit_iteration_limit);
        assert!(schedule.buildings.is_empty());
        assert_eq!(
            schedule.unmet_targets,
            vec![UnmetTarget::Building {
                kind: BuildingKind::Keep,
                reached: 1,
                target: 3,
            }]
        );
    }

    #[test]
    fn test_waits_for_resources() {
        let catalog = catalog();
        let targets = Targets::none().with_building(BuildingKind::Keep, 2);
        let options = SolverOptions::default();
        let initial = InitialState::default().with_stock(Resource::Iron, 0.0);
        let catalog = catalog.with_building(
            (1..=5).fold(BuildingData::new(BuildingKind::OreMine, 5), |b, n| {
                b.with_level(n, level(Costs::ZERO, 60, Some(128.0)))
            }),
        );
        let schedule = Solver::new(&catalog, &targets, &options).solve(&initial);

        // 32 iron at 128/h: a quarter hour plus one second.
        assert!(schedule.completed);
        assert_eq!(schedule.buildings[0].start, 901);
        assert_eq!(schedule.total_time_seconds, 1201);
    }

    #[test]
    fn test_wakes_for_later_candidate_when_first_never_affordable() {
        let market = BuildingData::new(BuildingKind::Market, 2)
            .with_level(1, level(Costs::ZERO, 0, None))
            .with_level(2, level(Costs::new(500, 0, 0, 0), 600, None));
        let catalog = catalog().with_building(market);
        let targets = Targets::none()
            .with_building(BuildingKind::Keep, 2)
            .with_building(BuildingKind::Market, 2);
        let options = SolverOptions::default();
        let initial = InitialState::default()
            .with_stock(Resource::Wood, 0.0)
            .with_stock(Resource::Iron, 0.0);
        let schedule = Solver::new(&catalog, &targets, &options).solve(&initial);

        // The keep never gets iron; the market waits 500 wood at 100/h.
        assert_eq!(schedule.buildings.len(), 1);
        assert_eq!(schedule.buildings[0].upgrade.kind, BuildingKind::Market);
        assert_eq!(schedule.buildings[0].start, 18_001);
        assert!(!schedule.completed);
        assert_eq!(
            schedule.unmet_targets,
            vec![UnmetTarget::Building {
                kind: BuildingKind::Keep,
                reached: 1,
                target: 2,
            }]
        );
    }

    #[test]
    fn test_leftover_research_bonus_starts_at_completion() {
        let catalog = catalog()
            .with_technology(TechData::new("Beer tester", Costs::ZERO, 3600))
            .with_technology(TechData::new("Zeta", Costs::new(150, 0, 0, 0), 600));
        let targets = Targets::none();
        let options = SolverOptions::default();
        let initial = InitialState::default().with_stock(Resource::Wood, 0.0);
        let schedule = Solver::new(&catalog, &targets, &options).solve(&initial);

        assert_eq!(schedule.research.len(), 2);
        assert_eq!(schedule.research[0].technology, "Beer tester");
        assert_eq!(schedule.research[0].end, 3600);
        // 100 wood by t=3600 at the base rate, then 50 more at 105/h.
        assert_eq!(schedule.research[1].technology, "Zeta");
        assert_eq!(schedule.research[1].start, 3600 + 1715);
        assert!((schedule.final_state.production_bonus - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_iteration_ceiling_reports_incomplete() {
        let catalog = catalog();
        let targets = Targets::none().with_building(BuildingKind::Lumberjack, 5);
        let options = SolverOptions {
            max_iterations: 2,
            ..SolverOptions::default()
        };
        let schedule = Solver::new(&catalog, &targets, &options).solve(&InitialState::default());

        assert!(schedule.hit_iteration_limit);
        assert!(!schedule.completed);
        assert_eq!(schedule.iterations, 2);
    }

    #[test]
    fn test_identical_inputs_identical_schedules() {
        let catalog = catalog();
        let targets = Targets::none()
            .with_building(BuildingKind::Lumberjack, 5)
            .with_building(BuildingKind::Keep, 3);
        let options = SolverOptions::default();
        let solver = Solver::new(&catalog, &targets, &options);
        let first = solver.solve(&InitialState::default());
        let second = solver.solve(&InitialState::default());
        assert_eq!(first, second);
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }
}
