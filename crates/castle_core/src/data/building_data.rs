//! Per-level building definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::buildings::BuildingKind;
use crate::resources::Costs;

/// Data for a single level of a building.
///
/// # Example JSON
///
/// ```json
/// {
///     "costs": { "wood": 50, "stone": 60, "iron": 40, "food": 1 },
///     "build_time_seconds": 600,
///     "production_rate": 17.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingLevelData {
    /// Cost of upgrading into this level.
    #[serde(default)]
    pub costs: Costs,

    /// Time the building queue is busy for this upgrade.
    pub build_time_seconds: u64,

    /// Resources per hour at this level (producers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_rate: Option<f64>,

    /// Storage cap at this level (stores), or population capacity (farm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<u32>,
}

impl BuildingLevelData {
    /// Build time in hours.
    #[must_use]
    pub fn build_hours(&self) -> f64 {
        self.build_time_seconds as f64 / 3600.0
    }
}

/// Catalog entry for one building kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingData {
    /// The building kind.
    pub kind: BuildingKind,

    /// Highest level the catalog defines.
    pub max_level: u32,

    /// Level data keyed by level number.
    #[serde(default)]
    pub levels: BTreeMap<u32, BuildingLevelData>,

    /// Technology required to upgrade into a given level.
    #[serde(default)]
    pub tech_prerequisites: BTreeMap<u32, String>,
}

impl BuildingData {
    /// Create an entry with no levels.
    #[must_use]
    pub fn new(kind: BuildingKind, max_level: u32) -> Self {
        Self {
            kind,
            max_level,
            levels: BTreeMap::new(),
            tech_prerequisites: BTreeMap::new(),
        }
    }

    /// Add level data, builder style.
    #[must_use]
    pub fn with_level(mut self, level: u32, data: BuildingLevelData) -> Self {
        self.levels.insert(level, data);
        self
    }

    /// Add a technology gate for a level, builder style.
    #[must_use]
    pub fn with_tech_prerequisite(mut self, level: u32, technology: impl Into<String>) -> Self {
        self.tech_prerequisites.insert(level, technology.into());
        self
    }

    /// Level data, if the catalog defines it.
    #[must_use]
    pub fn level(&self, level: u32) -> Option<&BuildingLevelData> {
        self.levels.get(&level)
    }

    /// Technology gating a level, if any.
    #[must_use]
    pub fn tech_for_level(&self, level: u32) -> Option<&str> {
        self.tech_prerequisites.get(&level).map(String::as_str)
    }

    /// Production rate at a level; zero when not a producing level.
    #[must_use]
    pub fn production_rate(&self, level: u32) -> f64 {
        self.level(level)
            .and_then(|data| data.production_rate)
            .unwrap_or(0.0)
    }

    /// Summed costs of every level in `(from, to]`.
    #[must_use]
    pub fn costs_between(&self, from: u32, to: u32) -> Costs {
        if from >= to {
            return Costs::ZERO;
        }
        self.levels
            .range(from.saturating_add(1)..=to)
            .fold(Costs::ZERO, |acc, (_, data)| acc + data.costs)
    }

    /// Summed build seconds of every level in `(from, to]`.
    #[must_use]
    pub fn build_seconds_between(&self, from: u32, to: u32) -> u64 {
        if from >= to {
            return 0;
        }
        self.levels
            .range(from.saturating_add(1)..=to)
            .map(|(_, data)| data.build_time_seconds)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(wood: u32, seconds: u64, rate: Option<f64>) -> BuildingLevelData {
        BuildingLevelData {
            costs: Costs::new(wood, 0, 0, 1),
            build_time_seconds: seconds,
            production_rate: rate,
            storage_capacity: None,
        }
    }

    fn lumberjack() -> BuildingData {
        BuildingData::new(BuildingKind::Lumberjack, 3)
            .with_level(1, level(0, 0, Some(5.0)))
            .with_level(2, level(10, 60, Some(8.0)))
            .with_level(3, level(20, 120, Some(12.0)))
            .with_tech_prerequisite(3, "Sawmill")
    }

    #[test]
    fn test_level_lookup() {
        let data = lumberjack();
        assert_eq!(data.production_rate(2), 8.0);
        assert_eq!(data.production_rate(9), 0.0);
        assert_eq!(data.tech_for_level(3), Some("Sawmill"));
        assert_eq!(data.tech_for_level(2), None);
    }

    #[test]
    fn test_ranges() {
        let data = lumberjack();
        assert_eq!(data.costs_between(1, 3), Costs::new(30, 0, 0, 2));
        assert_eq!(data.build_seconds_between(1, 3), 180);
        assert_eq!(data.build_seconds_between(3, 3), 0);
    }

    #[test]
    fn test_empty_and_reversed_ranges() {
        let data = lumberjack();
        assert_eq!(data.costs_between(3, 3), Costs::ZERO);
        assert_eq!(data.costs_between(3, 1), Costs::ZERO);
        assert_eq!(data.build_seconds_between(3, 1), 0);
        assert_eq!(data.build_seconds_between(u32::MAX, u32::MAX), 0);
    }

    #[test]
    fn test_level_data_from_json() {
        let json = r#"{"costs": {"wood": 5, "food": 2}, "build_time_seconds": 90, "storage_capacity": 300}"#;
        let data: BuildingLevelData = serde_json::from_str(json).unwrap();
        assert_eq!(data.costs, Costs::new(5, 0, 0, 2));
        assert_eq!(data.storage_capacity, Some(300));
        assert!(data.production_rate.is_none());
        assert!((data.build_hours() - 0.025).abs() < 1e-12);
    }
}
