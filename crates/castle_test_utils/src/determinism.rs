//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the solver produces identical
//! schedules given identical inputs.
//!
//! # Testing Strategy
//!
//! Sources of non-determinism the harness is meant to catch:
//!
//! - **Hash-map iteration order**: name-keyed tables must be `BTreeMap`s.
//! - **Thread scheduling**: the strategy search runs trials in parallel and
//!   must reduce them in grid order.
//! - **Float accumulation order**: resources must be advanced in the same
//!   sequence of steps on every run.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: single runs compared with `==`
//! 2. **Property tests**: random initial states still solve deterministically
//! 3. **Parallel tests**: N solves on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use castle_core::prelude::*;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical schedules.
    pub is_deterministic: bool,
    /// Fingerprints from each run.
    pub fingerprints: Vec<u64>,
}

impl DeterminismResult {
    fn from_fingerprints(fingerprints: Vec<u64>) -> Self {
        Self {
            is_deterministic: fingerprints.windows(2).all(|w| w[0] == w[1]),
            fingerprints,
        }
    }

    /// All distinct fingerprints; exactly one for a deterministic solver.
    #[must_use]
    pub fn unique_fingerprints(&self) -> Vec<u64> {
        let mut unique = self.fingerprints.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different fingerprints.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            panic!(
                "Solver is non-deterministic!\n\
                 Runs: {}\n\
                 Unique fingerprints: {} (expected 1)\n\
                 All fingerprints: {:?}",
                self.fingerprints.len(),
                self.unique_fingerprints().len(),
                self.fingerprints
            );
        }
    }
}

/// Solve the same problem `runs` times in sequence and compare fingerprints.
///
/// # Example
///
/// ```ignore
/// use castle_test_utils::determinism::verify_determinism;
/// use castle_test_utils::fixtures::{fresh_castle, small_targets, standard_catalog};
///
/// let catalog = standard_catalog();
/// let result = verify_determinism(5, &catalog, &fresh_castle(), &small_targets(), &Default::default());
/// result.assert_deterministic();
/// ```
#[must_use]
pub fn verify_determinism(
    runs: usize,
    catalog: &Catalog,
    initial: &InitialState,
    targets: &Targets,
    options: &SolverOptions,
) -> DeterminismResult {
    let solver = Solver::new(catalog, targets, options);
    let fingerprints = (0..runs)
        .map(|_| solver.solve(initial).fingerprint().expect("schedule encodes"))
        .collect();
    DeterminismResult::from_fingerprints(fingerprints)
}

/// Solve the same problem on `threads` scoped threads at once.
///
/// Catches non-determinism that only shows under concurrent execution.
#[must_use]
pub fn verify_parallel_determinism(
    threads: usize,
    catalog: &Catalog,
    initial: &InitialState,
    targets: &Targets,
    options: &SolverOptions,
) -> DeterminismResult {
    let solver = Solver::new(catalog, targets, options);
    let fingerprints = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| solver.solve(initial).fingerprint().expect("schedule encodes"))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(0))
            .collect()
    });
    DeterminismResult::from_fingerprints(fingerprints)
}

/// Index of the first timeline entry where two schedules differ.
///
/// Useful for debugging divergence: `None` when the timelines match
/// entry for entry.
#[must_use]
pub fn find_first_divergence(a: &Schedule, b: &Schedule) -> Option<usize> {
    let left = a.timeline();
    let right = b.timeline();
    let common = left.len().min(right.len());
    (0..common)
        .find(|&i| left[i] != right[i])
        .or((left.len() != right.len()).then_some(common))
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for scheduler inputs.
///
/// These generate random but reproducible problems small enough to solve
/// many times per test.
pub mod strategies {
    use castle_core::prelude::*;
    use proptest::prelude::*;

    /// Starting levels between 1 and 4 for every building.
    pub fn arb_levels() -> impl Strategy<Value = BuildingLevels> {
        proptest::array::uniform13(1u32..=4).prop_map(PerBuilding)
    }

    /// Starting stock for each resource.
    pub fn arb_stock() -> impl Strategy<Value = PerResource<f64>> {
        proptest::array::uniform3(0u32..=400).prop_map(|a| PerResource(a.map(f64::from)))
    }

    /// A random starting castle.
    pub fn arb_initial_state() -> impl Strategy<Value = InitialState> {
        (arb_levels(), arb_stock()).prop_map(|(levels, stock)| InitialState {
            levels,
            stock,
            ..InitialState::default()
        })
    }

    /// Producer targets one to three levels above level 4.
    pub fn arb_producer_targets() -> impl Strategy<Value = Targets> {
        (5u32..=7, 5u32..=7, 5u32..=7, proptest::option::of(2u32..=4)).prop_map(
            |(wood, stone, iron, keep)| {
                let targets = Targets::none()
                    .with_building(BuildingKind::Lumberjack, wood)
                    .with_building(BuildingKind::Quarry, stone)
                    .with_building(BuildingKind::OreMine, iron);
                match keep {
                    Some(level) => targets.with_building(BuildingKind::Keep, level),
                    None => targets,
                }
            },
        )
    }

    /// Any strategy on the default search grid.
    pub fn arb_strategy() -> impl Strategy<Value = ResourceStrategy> {
        (0u32..=10)
            .prop_flat_map(|wood| (Just(wood), 0u32..=wood))
            .prop_map(|(wood, quarry)| ResourceStrategy::new(wood, quarry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fresh_castle, small_targets, standard_catalog};
    use proptest::prelude::*;

    #[test]
    fn test_sequential_runs_match() {
        let catalog = standard_catalog();
        verify_determinism(
            3,
            &catalog,
            &fresh_castle(),
            &small_targets(),
            &SolverOptions::default(),
        )
        .assert_deterministic();
    }

    #[test]
    fn test_parallel_runs_match() {
        let catalog = standard_catalog();
        let result = verify_parallel_determinism(
            4,
            &catalog,
            &fresh_castle(),
            &small_targets(),
            &SolverOptions::default(),
        );
        result.assert_deterministic();
        assert_eq!(result.unique_fingerprints().len(), 1);
    }

    #[test]
    fn test_divergence_detection() {
        let catalog = standard_catalog();
        let targets = small_targets();
        let options = SolverOptions::default();
        let solver = Solver::new(&catalog, &targets, &options);
        let a = solver.solve(&fresh_castle());
        assert_eq!(find_first_divergence(&a, &a.clone()), None);

        let mut b = a.clone();
        b.buildings[0].end += 1;
        assert_eq!(find_first_divergence(&a, &b), Some(0));

        let mut c = a.clone();
        c.buildings.pop();
        assert!(find_first_divergence(&a, &c).is_some());
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash(&"castle"), compute_hash(&"castle"));
        assert_ne!(compute_hash(&1u32), compute_hash(&2u32));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_random_castles_solve_deterministically(
            initial in strategies::arb_initial_state(),
            targets in strategies::arb_producer_targets(),
        ) {
            let catalog = standard_catalog();
            let result = verify_determinism(2, &catalog, &initial, &targets, &SolverOptions::default());
            prop_assert!(result.is_deterministic);
        }

        #[test]
        fn prop_strategies_round_trip_through_text(strategy in strategies::arb_strategy()) {
            let parsed: ResourceStrategy = strategy.to_string().parse().unwrap();
            prop_assert_eq!(parsed, strategy);
        }
    }
}
