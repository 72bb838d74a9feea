//! The immutable result of a run.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::Hasher;

use serde::{Deserialize, Serialize};

use crate::actions::{BuildingUpgrade, NextAction, QueueKind};
use crate::buildings::BuildingKind;
use crate::error::{CastleError, Result};
use crate::resources::{Costs, PerResource};
use crate::state::FinalState;
use crate::strategy::ResourceStrategy;
use crate::units::{Army, UnitKind};

// ============================================================================
// Action log records
// ============================================================================

/// A finished building upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// The upgrade.
    pub upgrade: BuildingUpgrade,
    /// Start time in seconds.
    pub start: u64,
    /// End time in seconds.
    pub end: u64,
    /// Cost paid at the start.
    pub costs: Costs,
    /// Population used after the upgrade started.
    pub food_used: u32,
    /// Population capacity after the upgrade finished.
    pub food_capacity: u32,
}

/// A finished research.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    /// Technology name.
    pub technology: String,
    /// Start time in seconds.
    pub start: u64,
    /// End time in seconds.
    pub end: u64,
    /// Cost paid at the start.
    pub costs: Costs,
    /// Population used after the research started.
    pub food_used: u32,
    /// Population capacity at completion.
    pub food_capacity: u32,
}

/// A trained unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Unit kind.
    pub unit: UnitKind,
    /// Start time in seconds.
    pub start: u64,
    /// End time in seconds.
    pub end: u64,
    /// Cost paid at the start.
    pub costs: Costs,
    /// Population used after training started.
    pub food_used: u32,
    /// Population capacity at completion.
    pub food_capacity: u32,
}

/// A completed mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRecord {
    /// Mission name.
    pub name: String,
    /// Start time in seconds.
    pub start: u64,
    /// End time in seconds.
    pub end: u64,
    /// Resources paid at the start.
    pub costs: Costs,
    /// Units that went.
    pub units: Army,
    /// Average rewards credited, before caps.
    pub rewards: PerResource<f64>,
}

// ============================================================================
// Targets left open
// ============================================================================

/// A target the run did not reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnmetTarget {
    /// Building below its target level.
    Building {
        /// Building kind.
        kind: BuildingKind,
        /// Level reached.
        reached: u32,
        /// Level wanted.
        target: u32,
    },
    /// Technology not researched.
    Technology {
        /// Technology name.
        name: String,
    },
    /// Too few units of a kind.
    Units {
        /// Unit kind.
        unit: UnitKind,
        /// Units owned.
        reached: u32,
        /// Units wanted.
        target: u32,
    },
}

impl fmt::Display for UnmetTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmetTarget::Building {
                kind,
                reached,
                target,
            } => write!(f, "{} at {reached}/{target}", kind.display_name()),
            UnmetTarget::Technology { name } => write!(f, "{name} not researched"),
            UnmetTarget::Units {
                unit,
                reached,
                target,
            } => write!(f, "{unit} at {reached}/{target}"),
        }
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// One row of the merged timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Queue the action ran on.
    pub queue: QueueKind,
    /// What was started.
    pub action: NextAction,
    /// Start time in seconds.
    pub start: u64,
    /// End time in seconds.
    pub end: u64,
    /// Cost paid.
    pub costs: Costs,
    /// Population used after the start.
    pub food_used: u32,
    /// Population capacity at completion.
    pub food_capacity: u32,
}

/// A fully timed build order.
///
/// # Example JSON
///
/// ```json
/// {
///     "buildings": [
///         {
///             "upgrade": { "kind": "lumberjack", "from_level": 1, "to_level": 2 },
///             "start": 0, "end": 180,
///             "costs": { "wood": 50, "stone": 60, "iron": 40, "food": 1 },
///             "food_used": 1, "food_capacity": 40
///         }
///     ],
///     "total_time_seconds": 180,
///     "completed": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Building upgrades in completion order.
    pub buildings: Vec<BuildingRecord>,
    /// Research in completion order.
    pub research: Vec<ResearchRecord>,
    /// Trained units in completion order.
    pub training: Vec<TrainingRecord>,
    /// Missions in completion order.
    pub missions: Vec<MissionRecord>,
    /// Time the last queue finishes.
    pub total_time_seconds: u64,
    /// State after everything finished.
    pub final_state: FinalState,
    /// Whether every target was reached.
    pub completed: bool,
    /// Targets not reached.
    pub unmet_targets: Vec<UnmetTarget>,
    /// Events processed by the main loop.
    pub iterations: u64,
    /// Whether the main loop stopped at the iteration ceiling.
    pub hit_iteration_limit: bool,
    /// Strategy the schedule was produced with.
    pub strategy: Option<ResourceStrategy>,
}

impl Schedule {
    /// Number of building, research and training actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.buildings.len() + self.research.len() + self.training.len()
    }

    /// Building, research and training actions merged and sorted by start.
    ///
    /// Ties keep queue order: building, research, training.
    #[must_use]
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let buildings = self.buildings.iter().map(|r| TimelineEntry {
            queue: QueueKind::Building,
            action: NextAction::Building(r.upgrade),
            start: r.start,
            end: r.end,
            costs: r.costs,
            food_used: r.food_used,
            food_capacity: r.food_capacity,
        });
        let research = self.research.iter().map(|r| TimelineEntry {
            queue: QueueKind::Research,
            action: NextAction::Research {
                technology: r.technology.clone(),
            },
            start: r.start,
            end: r.end,
            costs: r.costs,
            food_used: r.food_used,
            food_capacity: r.food_capacity,
        });
        let training = self.training.iter().map(|r| TimelineEntry {
            queue: QueueKind::Training,
            action: NextAction::Train { unit: r.unit },
            start: r.start,
            end: r.end,
            costs: r.costs,
            food_used: r.food_used,
            food_capacity: r.food_capacity,
        });

        let mut entries: Vec<TimelineEntry> = buildings.chain(research).chain(training).collect();
        entries.sort_by_key(|e| (e.start, e.queue));
        entries
    }

    /// The first action to start, or [`NextAction::Idle`] if there is none.
    #[must_use]
    pub fn next_action(&self) -> NextAction {
        self.timeline()
            .into_iter()
            .next()
            .map_or(NextAction::Idle, |entry| entry.action)
    }

    /// Stable 64-bit hash of the encoded schedule.
    ///
    /// Two schedules with the same fingerprint are byte-identical in every
    /// record, timing and final state.
    pub fn fingerprint(&self) -> Result<u64> {
        let bytes =
            bincode::serialize(self).map_err(|e| CastleError::EncodeError(e.to_string()))?;
        let mut hasher = DefaultHasher::new();
        hasher.write(&bytes);
        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::BuildingLevels;
    use std::collections::BTreeSet;

    fn final_state() -> FinalState {
        FinalState {
            levels: BuildingLevels::starting(),
            stock: PerResource::splat(0.0),
            rates: PerResource::splat(0.0),
            caps: PerResource::splat(None),
            production_bonus: 1.0,
            researched: BTreeSet::new(),
            army: Army::EMPTY,
            food_used: 0,
            food_capacity: 40,
        }
    }

    fn schedule() -> Schedule {
        Schedule {
            buildings: vec![
                BuildingRecord {
                    upgrade: BuildingUpgrade::next(BuildingKind::Library, 1),
                    start: 0,
                    end: 100,
                    costs: Costs::new(10, 10, 10, 1),
                    food_used: 1,
                    food_capacity: 40,
                },
                BuildingRecord {
                    upgrade: BuildingUpgrade::next(BuildingKind::Keep, 1),
                    start: 300,
                    end: 500,
                    costs: Costs::ZERO,
                    food_used: 1,
                    food_capacity: 40,
                },
            ],
            research: vec![ResearchRecord {
                technology: "Masonry".to_string(),
                start: 100,
                end: 300,
                costs: Costs::ZERO,
                food_used: 1,
                food_capacity: 40,
            }],
            training: Vec::new(),
            missions: Vec::new(),
            total_time_seconds: 500,
            final_state: final_state(),
            completed: true,
            unmet_targets: Vec::new(),
            iterations: 7,
            hit_iteration_limit: false,
            strategy: None,
        }
    }

    #[test]
    fn test_timeline_sorted_by_start() {
        let starts: Vec<u64> = schedule().timeline().iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 100, 300]);
        assert_eq!(schedule().action_count(), 3);
    }

    #[test]
    fn test_next_action() {
        assert_eq!(schedule().next_action().to_string(), "building:library:2");

        let mut empty = schedule();
        empty.buildings.clear();
        empty.research.clear();
        assert_eq!(empty.next_action(), NextAction::Idle);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = schedule();
        let mut b = schedule();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        b.buildings[1].end += 1;
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_covers_strategy() {
        let a = schedule();
        let mut b = schedule();
        b.strategy = Some(ResourceStrategy::new(3, 1));
        assert_eq!(a.total_time_seconds, b.total_time_seconds);
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_unmet_target_display() {
        let unmet = UnmetTarget::Building {
            kind: BuildingKind::OreMine,
            reached: 3,
            target: 10,
        };
        assert_eq!(unmet.to_string(), "Ore Mine at 3/10");
        let units = UnmetTarget::Units {
            unit: UnitKind::Archer,
            reached: 0,
            target: 2,
        };
        assert_eq!(units.to_string(), "archer at 0/2");
    }
}
