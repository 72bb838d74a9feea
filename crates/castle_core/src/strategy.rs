//! Resource-lead strategy search.
//!
//! A strategy caps how far lumberjack and quarry may run ahead of the ore
//! mine. The search solves once per strategy on a small grid and keeps the
//! fastest schedule. Trials run in parallel; the reduce scans results in
//! grid order so the outcome never depends on thread timing.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::InitialState;
use crate::error::CastleError;
use crate::schedule::Schedule;
use crate::solver::{Solver, SolverOptions};

/// How many levels wood and stone production may lead iron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceStrategy {
    /// Lumberjack lead over the ore mine.
    pub wood_lead: u32,
    /// Quarry lead over the ore mine.
    pub quarry_lead: u32,
}

impl ResourceStrategy {
    /// Producers advance level by level together.
    pub const ROUND_ROBIN: Self = Self::new(0, 0);

    /// A strategy with the given leads.
    #[must_use]
    pub const fn new(wood_lead: u32, quarry_lead: u32) -> Self {
        Self {
            wood_lead,
            quarry_lead,
        }
    }

    /// Every strategy with `quarry_lead <= wood_lead <= max_wood_lead`, row
    /// by row.
    #[must_use]
    pub fn grid(max_wood_lead: u32) -> Vec<Self> {
        (0..=max_wood_lead)
            .flat_map(|wood| (0..=wood).map(move |quarry| Self::new(wood, quarry)))
            .collect()
    }
}

impl fmt::Display for ResourceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ROUND_ROBIN {
            f.write_str("RoundRobin")
        } else {
            write!(f, "W+{}/Q+{}", self.wood_lead, self.quarry_lead)
        }
    }
}

impl FromStr for ResourceStrategy {
    type Err = CastleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("roundrobin") {
            return Ok(Self::ROUND_ROBIN);
        }
        let parse_error = || CastleError::DataParseError {
            source_name: "strategy".to_string(),
            message: format!("expected 'RoundRobin' or 'W+<n>/Q+<n>', got '{s}'"),
        };
        let (wood, quarry) = s.split_once('/').ok_or_else(parse_error)?;
        let wood = wood
            .strip_prefix("W+")
            .and_then(|n| n.parse().ok())
            .ok_or_else(parse_error)?;
        let quarry = quarry
            .strip_prefix("Q+")
            .and_then(|n| n.parse().ok())
            .ok_or_else(parse_error)?;
        Ok(Self::new(wood, quarry))
    }
}

/// Search grid and early-exit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Largest wood lead tried.
    pub max_wood_lead: u32,
    /// Stop after this many consecutive trials without improvement.
    pub patience: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_wood_lead: 10,
            patience: Some(5),
        }
    }
}

/// Summary of one strategy trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Strategy tried.
    pub strategy: ResourceStrategy,
    /// Total schedule length in seconds.
    pub total_time_seconds: u64,
    /// Whether every target was reached.
    pub completed: bool,
    /// Building upgrades in the schedule.
    pub building_actions: usize,
}

impl Trial {
    fn of(schedule: &Schedule, strategy: ResourceStrategy) -> Self {
        Self {
            strategy,
            total_time_seconds: schedule.total_time_seconds,
            completed: schedule.completed,
            building_actions: schedule.buildings.len(),
        }
    }
}

/// Result of a strategy search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Winning schedule, with its strategy recorded.
    pub best: Schedule,
    /// Trials considered, in grid order.
    pub trials: Vec<Trial>,
}

impl SearchOutcome {
    /// Strategy of the winning schedule.
    #[must_use]
    pub fn best_strategy(&self) -> ResourceStrategy {
        self.best.strategy.unwrap_or_default()
    }
}

/// Whether `candidate` should replace `best`.
fn improves(candidate: &Schedule, best: &Schedule) -> bool {
    match (candidate.completed, best.completed) {
        (true, false) => true,
        (false, true) => false,
        _ => candidate.total_time_seconds < best.total_time_seconds,
    }
}

impl Solver<'_> {
    /// Solve once per strategy on the grid and keep the best schedule.
    #[must_use]
    pub fn search(&self, initial: &InitialState, config: &SearchConfig) -> SearchOutcome {
        let grid = ResourceStrategy::grid(config.max_wood_lead);
        let catalog = self.catalog;
        let targets = self.targets;
        let base = self.options;

        let mut results: Vec<(ResourceStrategy, Schedule)> = grid
            .into_par_iter()
            .map(|strategy| {
                let options = SolverOptions {
                    lead: Some(strategy),
                    ..base.clone()
                };
                let schedule = Solver::new(catalog, targets, &options).solve(initial);
                debug!(
                    "Strategy {}: {}s, completed={}",
                    strategy, schedule.total_time_seconds, schedule.completed
                );
                (strategy, schedule)
            })
            .collect();

        let mut trials = Vec::with_capacity(results.len());
        let mut best_index = 0;
        let mut stale = 0;
        for (index, (strategy, schedule)) in results.iter().enumerate() {
            trials.push(Trial::of(schedule, *strategy));
            if index == 0 {
                continue;
            }
            if improves(schedule, &results[best_index].1) {
                best_index = index;
                stale = 0;
            } else {
                stale += 1;
                if config.patience.is_some_and(|patience| stale >= patience) {
                    break;
                }
            }
        }

        let (strategy, mut best) = results.swap_remove(best_index);
        best.strategy = Some(strategy);
        info!(
            "Best strategy {} after {} trials: {}s, completed={}",
            strategy,
            trials.len(),
            best.total_time_seconds,
            best.completed
        );
        SearchOutcome { best, trials }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        assert_eq!(ResourceStrategy::ROUND_ROBIN.to_string(), "RoundRobin");
        assert_eq!(ResourceStrategy::new(3, 1).to_string(), "W+3/Q+1");

        for text in ["RoundRobin", "W+3/Q+1", "W+10/Q+0"] {
            let parsed: ResourceStrategy = text.parse().unwrap();
            assert_eq!(parsed.to_string(), text);
        }
        assert_eq!(
            "W+0/Q+0".parse::<ResourceStrategy>().unwrap(),
            ResourceStrategy::ROUND_ROBIN
        );
        assert!("W3/Q1".parse::<ResourceStrategy>().is_err());
        assert!("W+3".parse::<ResourceStrategy>().is_err());
    }

    #[test]
    fn test_grid_is_triangular_and_row_major() {
        let grid = ResourceStrategy::grid(10);
        assert_eq!(grid.len(), 66);
        assert_eq!(grid[0], ResourceStrategy::ROUND_ROBIN);
        assert_eq!(grid[1], ResourceStrategy::new(1, 0));
        assert_eq!(grid[2], ResourceStrategy::new(1, 1));
        assert!(grid.iter().all(|s| s.quarry_lead <= s.wood_lead));
    }
}
