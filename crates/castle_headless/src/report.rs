//! Plain-text reports for a finished schedule.
//!
//! Every renderer returns a `String`; the binary decides where it goes.

use std::fmt::Write as _;
use std::path::Path;

use castle_core::prelude::*;

const RULE_WIDTH: usize = 110;

/// Render seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Render seconds as a short human duration, e.g. `3d 4h 12m`.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let minutes = (seconds % 3600) / 60;
    match (days, hours) {
        (0, 0) => format!("{minutes}m {}s", seconds % 60),
        (0, _) => format!("{hours}h {minutes}m"),
        _ => format!("{days}d {hours}h {minutes}m"),
    }
}

/// Fixed-width cost column.
pub fn format_costs(costs: &Costs) -> String {
    format!(
        "W:{:5} S:{:5} I:{:4} F:{:2}",
        costs.wood, costs.stone, costs.iron, costs.food
    )
}

fn rule(out: &mut String, ch: char) {
    out.extend(std::iter::repeat(ch).take(RULE_WIDTH));
    out.push('\n');
}

/// Name and level columns for a timeline action.
fn describe(action: &NextAction) -> (String, String) {
    match action {
        NextAction::Building(upgrade) => (
            upgrade.kind.display_name().to_string(),
            format!("{} -> {}", upgrade.from_level, upgrade.to_level),
        ),
        NextAction::Research { technology } => (technology.clone(), "-".to_string()),
        NextAction::Train { unit } => (unit.name().to_string(), "-".to_string()),
        NextAction::Idle => ("-".to_string(), "-".to_string()),
    }
}

/// Comparison of every strategy trial, best marked with `*`.
pub fn strategy_table(outcome: &SearchOutcome) -> String {
    let best = outcome.best_strategy();
    let mut out = String::new();
    let _ = writeln!(out, "STRATEGY COMPARISON");
    rule(&mut out, '-');
    let _ = writeln!(
        out,
        "  {:<12} {:>12} {:>14} {:>10}  Status",
        "Strategy", "Total", "Duration", "Upgrades"
    );
    for trial in &outcome.trials {
        let marker = if trial.strategy == best { '*' } else { ' ' };
        let label = trial.strategy.to_string();
        let _ = writeln!(
            out,
            "{marker} {:<12} {:>12} {:>14} {:>10}  {}",
            label,
            format_hms(trial.total_time_seconds),
            format_duration(trial.total_time_seconds),
            trial.building_actions,
            if trial.completed { "complete" } else { "incomplete" }
        );
    }
    out
}

/// The unified action table, one row per started action.
pub fn action_table(schedule: &Schedule) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<9} {:<20} {:<9} {:>10} {:>10} {:>10}  {:<27} {:>7}",
        "#", "Queue", "Action", "Upgrade", "Start", "End", "Duration", "Costs", "Food"
    );
    rule(&mut out, '-');
    for (index, entry) in schedule.timeline().iter().enumerate() {
        let (name, upgrade) = describe(&entry.action);
        let food = format!("{}/{}", entry.food_used, entry.food_capacity);
        let _ = writeln!(
            out,
            "{:>4}  {:<9} {:<20} {:<9} {:>10} {:>10} {:>10}  {:<27} {:>7}",
            index + 1,
            entry.queue.label(),
            name,
            upgrade,
            format_hms(entry.start),
            format_hms(entry.end),
            format_hms(entry.end - entry.start),
            format_costs(&entry.costs),
            food,
        );
    }
    out
}

/// Missions run during the schedule, if any.
pub fn mission_table(schedule: &Schedule) -> String {
    let mut out = String::new();
    if schedule.missions.is_empty() {
        return out;
    }
    let _ = writeln!(out, "MISSIONS");
    rule(&mut out, '-');
    for mission in &schedule.missions {
        let rewards: Vec<String> = mission
            .rewards
            .iter()
            .filter(|(_, amount)| *amount > 0.0)
            .map(|(resource, amount)| format!("{resource} +{amount:.0}"))
            .collect();
        let _ = writeln!(
            out,
            "  {:<24} {:>10} {:>10}  {} units  {}",
            mission.name,
            format_hms(mission.start),
            format_hms(mission.end),
            mission.units.total(),
            rewards.join(", ")
        );
    }
    out
}

/// Totals, final state and a line per target.
pub fn summary(schedule: &Schedule, targets: &Targets) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    let _ = writeln!(out, "SUMMARY");
    rule(&mut out, '=');

    let _ = writeln!(
        out,
        "Total time:      {} ({})",
        format_hms(schedule.total_time_seconds),
        format_duration(schedule.total_time_seconds)
    );
    if let Some(strategy) = schedule.strategy {
        let _ = writeln!(out, "Strategy:        {strategy}");
    }
    let _ = writeln!(
        out,
        "Actions:         {} buildings, {} research, {} units, {} missions",
        schedule.buildings.len(),
        schedule.research.len(),
        schedule.training.len(),
        schedule.missions.len()
    );
    let state = &schedule.final_state;
    let _ = writeln!(
        out,
        "Final stock:     wood {:.0}, stone {:.0}, iron {:.0}",
        state.stock[Resource::Wood],
        state.stock[Resource::Stone],
        state.stock[Resource::Iron]
    );
    let _ = writeln!(
        out,
        "Population:      {}/{}",
        state.food_used, state.food_capacity
    );
    let _ = writeln!(
        out,
        "Production:      x{:.2} ({} technologies researched)",
        state.production_bonus,
        state.researched.len()
    );
    if schedule.hit_iteration_limit {
        let _ = writeln!(
            out,
            "Stopped at the iteration ceiling after {} events",
            schedule.iterations
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Targets:");
    for (kind, target) in targets.buildings.iter() {
        let Some(target) = *target else {
            continue;
        };
        let reached = state.levels[kind];
        let _ = writeln!(
            out,
            "  [{}] {:<16} {:>3}/{:<3}",
            if reached >= target { "ok" } else { "--" },
            kind.display_name(),
            reached,
            target
        );
    }
    for technology in &targets.technologies {
        let done = state.researched.contains(technology);
        let _ = writeln!(
            out,
            "  [{}] {}",
            if done { "ok" } else { "--" },
            technology
        );
    }
    for (unit, target) in targets.units.iter() {
        if target == 0 {
            continue;
        }
        let owned = state.army.get(unit);
        let _ = writeln!(
            out,
            "  [{}] {:<16} {:>3}/{:<3}",
            if owned >= target { "ok" } else { "--" },
            unit.name(),
            owned,
            target
        );
    }

    let _ = writeln!(out);
    if schedule.completed {
        let _ = writeln!(out, "All targets reached.");
    } else {
        let _ = writeln!(out, "Unmet targets:");
        for unmet in &schedule.unmet_targets {
            let _ = writeln!(out, "  - {unmet}");
        }
    }
    out
}

/// Write a schedule as pretty JSON, creating parent directories.
pub fn save_schedule(path: &Path, schedule: &Schedule) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(schedule).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_test_utils::fixtures::{fresh_castle, standard_catalog};

    fn solved() -> (Schedule, Targets) {
        let catalog = standard_catalog();
        let targets = Targets::none()
            .with_building(BuildingKind::Lumberjack, 4)
            .with_building(BuildingKind::Keep, 3);
        let options = SolverOptions::default();
        let schedule = Solver::new(&catalog, &targets, &options).solve(&fresh_castle());
        (schedule, targets)
    }

    #[test]
    fn test_time_formats() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3723), "01:02:03");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
        assert_eq!(format_duration(75), "1m 15s");
        assert_eq!(format_duration(3 * 86_400 + 4 * 3600 + 12 * 60), "3d 4h 12m");
    }

    #[test]
    fn test_cost_column_is_fixed_width() {
        let small = format_costs(&Costs::new(1, 2, 3, 0));
        let large = format_costs(&Costs::new(12_345, 54_321, 9_999, 12));
        assert_eq!(small, "W:    1 S:    2 I:   3 F: 0");
        assert_eq!(small.len(), large.len());
    }

    #[test]
    fn test_action_table_lists_every_action() {
        let (schedule, _) = solved();
        let table = action_table(&schedule);
        // Header and rule plus one row per action.
        assert_eq!(table.lines().count(), schedule.action_count() + 2);
        assert!(table.contains("Lumberjack"));
        assert!(table.contains("1 -> 2"));
        assert!(table.contains("Masonry"));
    }

    #[test]
    fn test_summary_marks_targets() {
        let (schedule, targets) = solved();
        let text = summary(&schedule, &targets);
        assert!(text.contains("[ok] Lumberjack"));
        assert!(text.contains("[ok] Keep"));
        assert!(text.contains("All targets reached."));
        assert!(!text.contains("Unmet targets"));
    }

    #[test]
    fn test_summary_lists_unmet_targets() {
        let (mut schedule, targets) = solved();
        schedule.completed = false;
        schedule.unmet_targets = vec![UnmetTarget::Technology {
            name: "Alchemy".to_string(),
        }];
        let text = summary(&schedule, &targets);
        assert!(text.contains("Alchemy not researched"));
    }

    #[test]
    fn test_saved_schedule_reads_back() {
        let (schedule, _) = solved();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("schedule.json");
        save_schedule(&path, &schedule).unwrap();

        let loaded: Schedule =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.final_state.stock, schedule.final_state.stock);
        assert_eq!(loaded.final_state.rates, schedule.final_state.rates);
        assert_eq!(loaded.fingerprint().unwrap(), schedule.fingerprint().unwrap());
    }

    #[test]
    fn test_no_missions_renders_nothing() {
        let (mut schedule, _) = solved();
        schedule.missions.clear();
        assert!(mission_table(&schedule).is_empty());
    }
}
