//! Schedule invariant checker.
//!
//! Replays a finished schedule against its catalog and reports every rule
//! it breaks. Integration and property tests assert the result is empty.

use std::collections::BTreeMap;
use std::fmt;

use castle_core::buildings::BuildingRole;
use castle_core::data::{is_production_technology, PRODUCTION_BONUS_STEP};
use castle_core::prelude::*;

/// Slack for float comparisons during replay.
const EPSILON: f64 = 1e-6;

/// A broken scheduling rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A building did not advance by exactly one level.
    LevelSkipped {
        /// Building kind.
        kind: BuildingKind,
        /// Level expected before the upgrade.
        expected_from: u32,
        /// Level the record claims to start from.
        actual_from: u32,
    },
    /// Two actions on one queue overlap.
    QueueOverlap {
        /// The queue.
        queue: QueueKind,
        /// Start of the later action.
        at: u64,
    },
    /// A gated upgrade started before its technology finished.
    GateIgnored {
        /// The upgrade.
        upgrade: BuildingUpgrade,
        /// Technology it needed.
        technology: String,
    },
    /// Population usage exceeded capacity.
    PopulationExceeded {
        /// Start time.
        at: u64,
        /// Usage after the start.
        used: u32,
        /// Capacity in force.
        capacity: u32,
    },
    /// A cost exceeded the storage cap in force.
    CapExceeded {
        /// Start time.
        at: u64,
        /// Resource over cap.
        resource: Resource,
    },
    /// Replayed stock dropped below zero.
    NegativeStock {
        /// Time of the spend.
        at: u64,
        /// Resource that went negative.
        resource: Resource,
        /// Replayed amount.
        amount: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::LevelSkipped {
                kind,
                expected_from,
                actual_from,
            } => write!(f, "{kind} upgraded from {actual_from}, expected {expected_from}"),
            Violation::QueueOverlap { queue, at } => {
                write!(f, "{} queue overlaps at {at}s", queue.label())
            }
            Violation::GateIgnored {
                upgrade,
                technology,
            } => write!(f, "{upgrade} started before {technology}"),
            Violation::PopulationExceeded { at, used, capacity } => {
                write!(f, "population {used}/{capacity} at {at}s")
            }
            Violation::CapExceeded { at, resource } => {
                write!(f, "{resource} cost above cap at {at}s")
            }
            Violation::NegativeStock {
                at,
                resource,
                amount,
            } => write!(f, "{resource} at {amount:.3} after spend at {at}s"),
        }
    }
}

/// Check every invariant; an empty result means the schedule is sound.
#[must_use]
pub fn check_schedule(
    schedule: &Schedule,
    catalog: &Catalog,
    initial: &InitialState,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_levels(schedule, initial, &mut violations);
    check_queues(schedule, &mut violations);
    check_gates(schedule, catalog, initial, &mut violations);
    check_population(schedule, &mut violations);
    replay_resources(schedule, catalog, initial, &mut violations);
    violations
}

fn check_levels(schedule: &Schedule, initial: &InitialState, out: &mut Vec<Violation>) {
    let mut levels = initial.levels.clone();
    for record in &schedule.buildings {
        let kind = record.upgrade.kind;
        if record.upgrade.from_level != levels[kind]
            || record.upgrade.to_level != record.upgrade.from_level + 1
        {
            out.push(Violation::LevelSkipped {
                kind,
                expected_from: levels[kind],
                actual_from: record.upgrade.from_level,
            });
        }
        levels[kind] = record.upgrade.to_level;
    }
}

fn check_queues(schedule: &Schedule, out: &mut Vec<Violation>) {
    let mut by_queue: BTreeMap<QueueKind, Vec<(u64, u64)>> = BTreeMap::new();
    for entry in schedule.timeline() {
        by_queue
            .entry(entry.queue)
            .or_default()
            .push((entry.start, entry.end));
    }
    for (queue, mut intervals) in by_queue {
        intervals.sort_unstable();
        for pair in intervals.windows(2) {
            if pair[1].0 < pair[0].1 {
                out.push(Violation::QueueOverlap {
                    queue,
                    at: pair[1].0,
                });
            }
        }
    }
}

fn check_gates(
    schedule: &Schedule,
    catalog: &Catalog,
    initial: &InitialState,
    out: &mut Vec<Violation>,
) {
    for record in &schedule.buildings {
        let upgrade = record.upgrade;
        let Some(technology) = catalog.tech_for_level(upgrade.kind, upgrade.to_level) else {
            continue;
        };
        if initial.researched.contains(technology) {
            continue;
        }
        let done_in_time = schedule
            .research
            .iter()
            .any(|r| r.technology == technology && r.end <= record.start);
        if !done_in_time {
            out.push(Violation::GateIgnored {
                upgrade,
                technology: technology.to_string(),
            });
        }
    }
}

fn check_population(schedule: &Schedule, out: &mut Vec<Violation>) {
    for entry in schedule.timeline() {
        if entry.food_used > entry.food_capacity {
            out.push(Violation::PopulationExceeded {
                at: entry.start,
                used: entry.food_used,
                capacity: entry.food_capacity,
            });
        }
    }
}

// ============================================================================
// Resource replay
// ============================================================================

/// Something that changes the economy at a point in time.
#[derive(Debug, Clone)]
enum Step {
    MissionReturn(PerResource<f64>),
    LevelUp(BuildingKind, u32),
    Researched(String),
    Spend(Costs),
}

impl Step {
    // Completions before spends at equal times, mirroring the event order.
    fn order(&self) -> u8 {
        match self {
            Step::MissionReturn(_) => 0,
            Step::LevelUp(..) => 1,
            Step::Researched(_) => 2,
            Step::Spend(_) => 4,
        }
    }
}

struct Replay<'a> {
    catalog: &'a Catalog,
    levels: BuildingLevels,
    stock: PerResource<f64>,
    bonus: f64,
}

impl Replay<'_> {
    fn rate(&self, resource: Resource) -> f64 {
        let kind = BuildingKind::producer_of(resource);
        self.catalog
            .level(kind, self.levels[kind])
            .and_then(|data| data.production_rate)
            .unwrap_or(0.0)
    }

    fn cap(&self, resource: Resource) -> Option<u32> {
        let kind = BuildingKind::store_of(resource);
        self.catalog
            .level(kind, self.levels[kind])
            .and_then(|data| data.storage_capacity)
    }

    fn clamp(&mut self) {
        for resource in Resource::ALL {
            if let Some(cap) = self.cap(resource) {
                self.stock[resource] = self.stock[resource].min(f64::from(cap));
            }
        }
    }

    fn advance(&mut self, seconds: u64) {
        let hours = seconds as f64 / 3600.0;
        for resource in Resource::ALL {
            self.stock[resource] += self.rate(resource) * hours * self.bonus;
        }
        self.clamp();
    }
}

/// Replay the log with the most generous timing of production bonuses and
/// report any spend the replayed stock cannot cover.
fn replay_resources(
    schedule: &Schedule,
    catalog: &Catalog,
    initial: &InitialState,
    out: &mut Vec<Violation>,
) {
    let mut steps: Vec<(u64, Step)> = Vec::new();
    for r in &schedule.buildings {
        steps.push((r.start, Step::Spend(r.costs)));
        steps.push((r.end, Step::LevelUp(r.upgrade.kind, r.upgrade.to_level)));
    }
    for r in &schedule.research {
        steps.push((r.start, Step::Spend(r.costs)));
        steps.push((r.start, Step::Researched(r.technology.clone())));
    }
    for r in &schedule.training {
        steps.push((r.start, Step::Spend(r.costs)));
    }
    for r in &schedule.missions {
        steps.push((r.start, Step::Spend(r.costs)));
        steps.push((r.end, Step::MissionReturn(r.rewards)));
    }
    steps.sort_by_key(|(time, step)| (*time, step.order()));

    let bonus_steps = initial
        .researched
        .iter()
        .filter(|name| is_production_technology(name))
        .count();
    let mut replay = Replay {
        catalog,
        levels: initial.levels.clone(),
        stock: initial.stock,
        bonus: 1.0 + PRODUCTION_BONUS_STEP * bonus_steps as f64,
    };
    replay.clamp();

    let mut researched = initial.researched.clone();
    let mut now = 0;
    for (time, step) in steps {
        replay.advance(time - now);
        now = time;
        match step {
            Step::MissionReturn(rewards) => {
                for resource in Resource::ALL {
                    replay.stock[resource] += rewards[resource];
                }
                replay.clamp();
            }
            Step::LevelUp(kind, level) => {
                replay.levels[kind] = level;
                if matches!(kind.role(), BuildingRole::Storage(_)) {
                    replay.clamp();
                }
            }
            Step::Researched(name) => {
                if is_production_technology(&name) && researched.insert(name) {
                    replay.bonus += PRODUCTION_BONUS_STEP;
                }
            }
            Step::Spend(costs) => {
                for resource in Resource::ALL {
                    let cost = costs.get(resource);
                    if replay.cap(resource).is_some_and(|cap| cost > cap) {
                        out.push(Violation::CapExceeded { at: time, resource });
                    }
                    replay.stock[resource] -= f64::from(cost);
                    if replay.stock[resource] < -EPSILON {
                        out.push(Violation::NegativeStock {
                            at: time,
                            resource,
                            amount: replay.stock[resource],
                        });
                    }
                    replay.stock[resource] = replay.stock[resource].max(0.0);
                }
            }
        }
    }
}
