//! Missions dispatched by the full solver on the standard test catalog.

use castle_core::prelude::*;
use castle_core::schedule::MissionRecord;
use castle_test_utils::fixtures::standard_catalog;
use castle_test_utils::invariants::check_schedule;

/// Tavern 2 with five spearmen at home.
fn garrisoned_castle() -> InitialState {
    let mut initial = InitialState::default().with_level(BuildingKind::Tavern, 2);
    initial.army.add(UnitKind::Spearman, 5);
    initial
}

fn runs_of<'s>(schedule: &'s Schedule, name: &str) -> Vec<&'s MissionRecord> {
    let mut runs: Vec<&MissionRecord> = schedule
        .missions
        .iter()
        .filter(|record| record.name == name)
        .collect();
    runs.sort_by_key(|record| record.start);
    runs
}

#[test]
fn test_different_missions_run_side_by_side() {
    let catalog = standard_catalog();
    let targets = Targets::none().with_units(UnitKind::Spearman, 8);
    let options = SolverOptions::default();
    let schedule = Solver::new(&catalog, &targets, &options).solve(&garrisoned_castle());

    assert!(schedule.completed, "unmet: {:?}", schedule.unmet_targets);
    let quarry = runs_of(&schedule, "Guard Quarry");
    let wood = runs_of(&schedule, "Chop Wood");
    assert_eq!(quarry[0].start, 0);
    assert_eq!(wood[0].start, 0);
    assert!(check_schedule(&schedule, &catalog, &garrisoned_castle()).is_empty());
}

#[test]
fn test_same_mission_never_overlaps_itself() {
    let catalog = standard_catalog();
    let targets = Targets::none().with_units(UnitKind::Spearman, 8);
    let options = SolverOptions::default();
    let schedule = Solver::new(&catalog, &targets, &options).solve(&garrisoned_castle());

    for name in ["Chop Wood", "Guard Quarry"] {
        for pair in runs_of(&schedule, name).windows(2) {
            assert!(pair[0].end <= pair[1].start, "{name} overlaps itself");
        }
    }
}

#[test]
fn test_returning_units_are_dispatched_at_the_same_instant() {
    let catalog = standard_catalog();
    let targets = Targets::none().with_units(UnitKind::Spearman, 8);
    let options = SolverOptions::default();
    let schedule = Solver::new(&catalog, &targets, &options).solve(&garrisoned_castle());

    // The first run returns at 1800s and goes straight back out.
    let wood = runs_of(&schedule, "Chop Wood");
    assert!(wood.len() >= 2);
    assert_eq!(wood[0].end, 1800);
    assert_eq!(wood[1].start, wood[0].end);

    // Everyone is home once the drain finishes.
    assert_eq!(schedule.final_state.army.get(UnitKind::Spearman), 8);
}

#[test]
fn test_mission_rewards_stop_at_storage_cap() {
    let catalog = standard_catalog();
    let targets = Targets::none().with_units(UnitKind::Spearman, 8);
    let options = SolverOptions::default();
    let initial = garrisoned_castle().with_stock(Resource::Wood, 495.0);
    let schedule = Solver::new(&catalog, &targets, &options).solve(&initial);

    let wood = runs_of(&schedule, "Chop Wood");
    assert!(wood.iter().all(|record| record.rewards[Resource::Wood] == 80.0));
    // Wood store 1 holds 500; the last reward lands on a full store.
    assert_eq!(schedule.final_state.caps[Resource::Wood], Some(500));
    assert_eq!(schedule.final_state.stock[Resource::Wood], 500.0);
}

#[test]
fn test_missions_wait_for_building_targets() {
    let catalog = standard_catalog();
    let targets = Targets::none()
        .with_building(BuildingKind::Tavern, 3)
        .with_building(BuildingKind::Lumberjack, 6);
    let options = SolverOptions {
        max_iterations: 200_000,
        ..SolverOptions::default()
    };
    let schedule = Solver::new(&catalog, &targets, &options).solve(&garrisoned_castle());

    assert!(schedule.completed, "unmet: {:?}", schedule.unmet_targets);
    assert!(!schedule.hit_iteration_limit);
    assert!(schedule.missions.is_empty());
}

#[test]
fn test_train_during_build_allows_missions_early() {
    let catalog = standard_catalog();
    let targets = Targets::none().with_building(BuildingKind::Lumberjack, 4);
    let options = SolverOptions {
        train_during_build: true,
        ..SolverOptions::default()
    };
    let schedule = Solver::new(&catalog, &targets, &options).solve(&garrisoned_castle());

    assert!(schedule.completed, "unmet: {:?}", schedule.unmet_targets);
    assert!(schedule.missions.iter().any(|record| record.start == 0));
}
