//! Mutable simulation state for a single run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::actions::{BuildingUpgrade, QueueKind};
use crate::buildings::{BuildingKind, BuildingLevels, BuildingRole};
use crate::catalog::Catalog;
use crate::config::InitialState;
use crate::data::{is_production_technology, PRODUCTION_BONUS_STEP};
use crate::economy::Stockpile;
use crate::resources::PerResource;
use crate::units::{Army, UnitKind};

/// A mission currently away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningMission {
    /// Unique id within the run.
    pub id: u64,
    /// Index into [`Catalog::missions`].
    pub mission: usize,
    /// Mission name.
    pub name: String,
    /// Start time in seconds.
    pub start: u64,
    /// Completion time in seconds.
    pub end: u64,
    /// Units assigned for the duration.
    pub units: Army,
}

/// Everything that changes while a run is simulated.
///
/// Created once per run from an [`InitialState`] and mutated in place by
/// every processed event.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Current simulated time in seconds.
    pub now: u64,
    /// Time the building queue becomes free.
    pub building_free_at: u64,
    /// Time the research queue becomes free.
    pub research_free_at: u64,
    /// Time the training queue becomes free.
    pub training_free_at: u64,
    /// Upgrade in flight on the building queue.
    pub building_in_progress: Option<BuildingUpgrade>,
    /// Technology in flight on the research queue.
    pub research_in_progress: Option<String>,
    /// Unit in flight on the training queue.
    pub training_in_progress: Option<UnitKind>,
    /// Completed building levels.
    pub levels: BuildingLevels,
    /// Stock, rates, caps and production bonus.
    pub economy: Stockpile,
    /// Population consumed so far.
    pub food_used: u32,
    /// Population ceiling from the farm.
    pub food_capacity: u32,
    /// Researched technologies.
    pub researched: BTreeSet<String>,
    /// Units at home.
    pub army: Army,
    /// Units away on missions.
    pub on_mission: Army,
    /// Missions currently away, in start order.
    pub running_missions: Vec<RunningMission>,
    next_mission_id: u64,
}

impl SimulationState {
    /// Build the state for a fresh run, deriving rates, caps and population
    /// capacity from the starting levels.
    #[must_use]
    pub fn new(initial: &InitialState, catalog: &Catalog) -> Self {
        let mut economy = Stockpile::new(initial.stock);
        let bonus_steps = initial
            .researched
            .iter()
            .filter(|name| is_production_technology(name))
            .count();
        economy.bonus = 1.0 + PRODUCTION_BONUS_STEP * bonus_steps as f64;

        let mut state = Self {
            now: 0,
            building_free_at: 0,
            research_free_at: 0,
            training_free_at: 0,
            building_in_progress: None,
            research_in_progress: None,
            training_in_progress: None,
            levels: initial.levels.clone(),
            economy,
            food_used: initial.food_used,
            food_capacity: 0,
            researched: initial.researched.clone(),
            army: initial.army,
            on_mission: Army::EMPTY,
            running_missions: Vec::new(),
            next_mission_id: 0,
        };
        for kind in BuildingKind::ALL {
            state.apply_level_effects(kind, catalog);
        }
        state.economy.clamp_to_caps();
        state
    }

    /// Current level of a building.
    #[must_use]
    pub fn level(&self, kind: BuildingKind) -> u32 {
        self.levels[kind]
    }

    /// Refresh the rate, cap or population capacity a building contributes
    /// at its current level. Levels without data leave the value unchanged.
    pub fn apply_level_effects(&mut self, kind: BuildingKind, catalog: &Catalog) {
        let Some(data) = catalog.level(kind, self.levels[kind]) else {
            return;
        };
        match kind.role() {
            BuildingRole::Producer(resource) => {
                if let Some(rate) = data.production_rate {
                    self.economy.rates[resource] = rate;
                }
            }
            BuildingRole::Storage(resource) => {
                if let Some(cap) = data.storage_capacity {
                    self.economy.caps[resource] = Some(cap);
                }
            }
            BuildingRole::Population => {
                if let Some(capacity) = data.storage_capacity {
                    self.food_capacity = capacity;
                }
            }
            BuildingRole::Other => {}
        }
    }

    /// Move the clock forward, accumulating production.
    pub fn advance_to(&mut self, time: u64) {
        if time > self.now {
            self.economy.advance(time - self.now);
            self.now = time;
        }
    }

    /// Whether a queue has nothing in flight.
    #[must_use]
    pub fn is_idle(&self, queue: QueueKind) -> bool {
        match queue {
            QueueKind::Building => {
                self.now >= self.building_free_at && self.building_in_progress.is_none()
            }
            QueueKind::Research => {
                self.now >= self.research_free_at && self.research_in_progress.is_none()
            }
            QueueKind::Training => {
                self.now >= self.training_free_at && self.training_in_progress.is_none()
            }
        }
    }

    /// Free population.
    #[must_use]
    pub fn food_headroom(&self) -> u32 {
        self.food_capacity.saturating_sub(self.food_used)
    }

    /// Whether `food` more population fits under the ceiling.
    #[must_use]
    pub fn can_afford_food(&self, food: u32) -> bool {
        self.food_used.saturating_add(food) <= self.food_capacity
    }

    /// Whether a technology has been researched.
    #[must_use]
    pub fn is_researched(&self, technology: &str) -> bool {
        self.researched.contains(technology)
    }

    /// Record a finished technology, applying its production bonus once.
    pub fn mark_researched(&mut self, technology: &str) {
        if self.researched.insert(technology.to_string()) && is_production_technology(technology)
        {
            self.economy.bonus += PRODUCTION_BONUS_STEP;
        }
    }

    /// Allocate the next running-mission id.
    pub fn next_mission_id(&mut self) -> u64 {
        let id = self.next_mission_id;
        self.next_mission_id += 1;
        id
    }

    /// Immutable snapshot for the final schedule.
    #[must_use]
    pub fn snapshot(&self) -> FinalState {
        FinalState {
            levels: self.levels.clone(),
            stock: self.economy.stock,
            rates: self.economy.rates,
            caps: self.economy.caps,
            production_bonus: self.economy.bonus,
            researched: self.researched.clone(),
            army: self.army.combined(&self.on_mission),
            food_used: self.food_used,
            food_capacity: self.food_capacity,
        }
    }
}

/// State at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    /// Building levels.
    pub levels: BuildingLevels,
    /// Resource stock.
    pub stock: PerResource<f64>,
    /// Base production rates.
    pub rates: PerResource<f64>,
    /// Storage caps.
    pub caps: PerResource<Option<u32>>,
    /// Production multiplier.
    pub production_bonus: f64,
    /// Researched technologies.
    pub researched: BTreeSet<String>,
    /// All units, including any still away on missions.
    pub army: Army,
    /// Population consumed.
    pub food_used: u32,
    /// Population ceiling.
    pub food_capacity: u32,
}
