//! Test fixtures and helpers.
//!
//! Synthetic catalogs with the same shape as the shipped game data but
//! simple closed-form numbers, so tests can reason about costs and rates.

use castle_core::buildings::BuildingRole;
use castle_core::data::{RewardRange, UnitRequirement};
use castle_core::prelude::*;

/// Base resource cost of each building kind's first upgrade.
fn base_cost(kind: BuildingKind) -> Costs {
    match kind {
        BuildingKind::Lumberjack => Costs::new(20, 30, 10, 1),
        BuildingKind::Quarry => Costs::new(30, 20, 10, 1),
        BuildingKind::OreMine => Costs::new(30, 30, 5, 1),
        BuildingKind::Farm => Costs::new(25, 25, 10, 0),
        BuildingKind::WoodStore => Costs::new(20, 30, 10, 0),
        BuildingKind::StoneStore => Costs::new(30, 20, 10, 0),
        BuildingKind::OreStore => Costs::new(30, 30, 10, 0),
        BuildingKind::Keep => Costs::new(60, 60, 40, 2),
        BuildingKind::Arsenal => Costs::new(40, 40, 30, 1),
        BuildingKind::Library => Costs::new(45, 35, 20, 1),
        BuildingKind::Tavern => Costs::new(35, 30, 15, 1),
        BuildingKind::Market => Costs::new(50, 40, 20, 1),
        BuildingKind::Fortifications => Costs::new(40, 60, 30, 1),
    }
}

fn max_level(kind: BuildingKind) -> u32 {
    Targets::default_castle().building(kind).unwrap_or(10)
}

/// Cost of reaching `level`, growing quadratically.
fn level_cost(kind: BuildingKind, level: u32) -> Costs {
    let base = base_cost(kind);
    let grow = |amount: u32| amount + amount * level * level / 4;
    Costs::new(grow(base.wood), grow(base.stone), grow(base.iron), base.food)
}

fn level_data(kind: BuildingKind, level: u32) -> BuildingLevelData {
    let costs = if level == 1 {
        Costs::ZERO
    } else {
        level_cost(kind, level)
    };
    let (production_rate, storage_capacity) = match kind.role() {
        BuildingRole::Producer(_) => {
            (Some(f64::from(level) * 8.0 + 2.0), None)
        }
        BuildingRole::Storage(_) => (None, Some(500 * level)),
        BuildingRole::Population => (None, Some(20 + 20 * level)),
        BuildingRole::Other => (None, None),
    };
    BuildingLevelData {
        costs,
        build_time_seconds: u64::from(60 * level * level),
        production_rate,
        storage_capacity,
    }
}

/// Building data for one kind with every level filled in.
#[must_use]
pub fn building(kind: BuildingKind) -> BuildingData {
    let max = max_level(kind);
    (1..=max).fold(BuildingData::new(kind, max), |data, level| {
        data.with_level(level, level_data(kind, level))
    })
}

/// Technologies of the standard catalog.
#[must_use]
pub fn technologies() -> Vec<TechData> {
    [
        ("Beer tester", 2, Costs::new(80, 60, 40, 0), 1800),
        ("Wheelbarrow", 3, Costs::new(120, 100, 60, 0), 2700),
        ("Masonry", 2, Costs::new(100, 150, 50, 0), 1200),
        ("Crop rotation", 3, Costs::new(150, 100, 50, 1), 2400),
        ("Longbow", 3, Costs::new(90, 60, 80, 0), 1800),
        ("Swordsmith", 4, Costs::new(120, 80, 150, 0), 3600),
        ("Crossbow", 6, Costs::new(200, 150, 200, 0), 5400),
        ("Horse armour", 8, Costs::new(300, 250, 350, 0), 7200),
    ]
    .into_iter()
    .map(|(name, library, costs, seconds)| {
        TechData::new(name, costs, seconds).with_library_level(library)
    })
    .collect()
}

fn mission(
    name: &str,
    tavern_level: u32,
    duration_minutes: u32,
    units: &[(UnitKind, u32)],
    reward: (Resource, u32, u32),
) -> MissionData {
    MissionData {
        name: name.to_string(),
        tavern_level,
        max_tavern_level: 0,
        duration_minutes,
        units_required: units
            .iter()
            .map(|&(kind, count)| UnitRequirement { kind, count })
            .collect(),
        resource_costs: Costs::new(10, 10, 0, 0),
        rewards: vec![RewardRange {
            resource: reward.0,
            min: reward.1,
            max: reward.2,
        }],
    }
}

/// Missions of the standard catalog.
#[must_use]
pub fn missions() -> Vec<MissionData> {
    vec![
        mission(
            "Chop Wood",
            1,
            30,
            &[(UnitKind::Spearman, 2)],
            (Resource::Wood, 60, 100),
        ),
        mission(
            "Guard Quarry",
            2,
            60,
            &[(UnitKind::Spearman, 3)],
            (Resource::Stone, 120, 180),
        ),
        mission(
            "Escort Ore",
            4,
            90,
            &[(UnitKind::Spearman, 2), (UnitKind::Archer, 2)],
            (Resource::Iron, 200, 300),
        ),
    ]
}

/// A complete catalog covering every building kind.
///
/// Gates: keep 3 needs Masonry, farm 6 needs Crop rotation, arsenal 5
/// needs Swordsmith.
#[must_use]
pub fn standard_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for kind in BuildingKind::ALL {
        let mut data = building(kind);
        data = match kind {
            BuildingKind::Keep => data.with_tech_prerequisite(3, "Masonry"),
            BuildingKind::Farm => data.with_tech_prerequisite(6, "Crop rotation"),
            BuildingKind::Arsenal => data.with_tech_prerequisite(5, "Swordsmith"),
            _ => data,
        };
        catalog.insert_building(data);
    }
    for tech in technologies() {
        catalog.insert_technology(tech);
    }
    catalog.with_missions(missions())
}

/// The standard catalog with the ore mine producing nothing.
#[must_use]
pub fn catalog_without_iron() -> Catalog {
    let max = max_level(BuildingKind::OreMine);
    let barren = (1..=max).fold(BuildingData::new(BuildingKind::OreMine, max), |data, level| {
        data.with_level(
            level,
            BuildingLevelData {
                production_rate: Some(0.0),
                ..level_data(BuildingKind::OreMine, level)
            },
        )
    });
    standard_catalog().with_building(barren)
}

/// Every building at level 1 with 120 of each resource.
#[must_use]
pub fn fresh_castle() -> InitialState {
    InitialState::default()
}

/// A modest mixed target that finishes quickly.
#[must_use]
pub fn small_targets() -> Targets {
    Targets::none()
        .with_building(BuildingKind::Lumberjack, 6)
        .with_building(BuildingKind::Quarry, 5)
        .with_building(BuildingKind::OreMine, 4)
        .with_building(BuildingKind::Keep, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_consistent() {
        let catalog = standard_catalog();
        assert_eq!(catalog.building_count(), BuildingKind::COUNT);
        assert!(catalog.validate().is_empty(), "{:?}", catalog.validate());
    }

    #[test]
    fn test_level_costs_fit_max_storage() {
        let catalog = standard_catalog();
        for kind in BuildingKind::ALL {
            let data = catalog.building(kind).unwrap();
            let top = data.level(data.max_level).unwrap();
            for resource in Resource::ALL {
                assert!(top.costs.get(resource) <= 500 * 20, "{kind} {resource}");
            }
        }
    }
}
