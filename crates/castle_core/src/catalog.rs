//! The immutable game catalog.
//!
//! A [`Catalog`] bundles every static table the scheduler reads: building
//! levels, technologies, missions and unit training data. It is built once
//! (by a loader or a test fixture) and then shared read-only by every
//! simulation run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::buildings::{BuildingKind, BuildingRole, PerBuilding};
use crate::data::{BuildingData, BuildingLevelData, MissionData, TechData, UnitData};
use crate::units::UnitKind;

/// Static game data shared by all simulation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    buildings: PerBuilding<Option<BuildingData>>,
    technologies: BTreeMap<String, TechData>,
    missions: Vec<MissionData>,
    units: BTreeMap<UnitKind, UnitData>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// An empty catalog with the built-in unit table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buildings: PerBuilding::from_fn(|_| None),
            technologies: BTreeMap::new(),
            missions: Vec::new(),
            units: UnitKind::ALL
                .into_iter()
                .map(|kind| (kind, UnitData::builtin(kind)))
                .collect(),
        }
    }

    /// Add or replace a building entry.
    #[must_use]
    pub fn with_building(mut self, data: BuildingData) -> Self {
        self.insert_building(data);
        self
    }

    /// Add or replace a technology.
    #[must_use]
    pub fn with_technology(mut self, tech: TechData) -> Self {
        self.insert_technology(tech);
        self
    }

    /// Replace the mission list.
    #[must_use]
    pub fn with_missions(mut self, missions: Vec<MissionData>) -> Self {
        self.set_missions(missions);
        self
    }

    /// Override a unit definition.
    #[must_use]
    pub fn with_unit(mut self, unit: UnitData) -> Self {
        self.units.insert(unit.kind, unit);
        self
    }

    /// Add or replace a building entry in place.
    pub fn insert_building(&mut self, data: BuildingData) {
        let kind = data.kind;
        self.buildings[kind] = Some(data);
    }

    /// Add or replace a technology in place.
    pub fn insert_technology(&mut self, tech: TechData) {
        self.technologies.insert(tech.name.clone(), tech);
    }

    /// Replace the mission list, ordered by tavern level then name.
    pub fn set_missions(&mut self, mut missions: Vec<MissionData>) {
        missions.sort_by(|a, b| {
            a.tavern_level
                .cmp(&b.tavern_level)
                .then_with(|| a.name.cmp(&b.name))
        });
        self.missions = missions;
    }

    /// Building entry for a kind.
    #[must_use]
    pub fn building(&self, kind: BuildingKind) -> Option<&BuildingData> {
        self.buildings[kind].as_ref()
    }

    /// Level data for a building level.
    #[must_use]
    pub fn level(&self, kind: BuildingKind, level: u32) -> Option<&BuildingLevelData> {
        self.building(kind).and_then(|b| b.level(level))
    }

    /// Highest level the catalog defines for a kind.
    #[must_use]
    pub fn max_level(&self, kind: BuildingKind) -> Option<u32> {
        self.building(kind).map(|b| b.max_level)
    }

    /// Technology gating a building level.
    #[must_use]
    pub fn tech_for_level(&self, kind: BuildingKind, level: u32) -> Option<&str> {
        self.building(kind).and_then(|b| b.tech_for_level(level))
    }

    /// Technology by name.
    #[must_use]
    pub fn technology(&self, name: &str) -> Option<&TechData> {
        self.technologies.get(name)
    }

    /// All technologies, ordered by name.
    pub fn technologies(&self) -> impl Iterator<Item = &TechData> {
        self.technologies.values()
    }

    /// Number of known technologies.
    #[must_use]
    pub fn technology_count(&self) -> usize {
        self.technologies.len()
    }

    /// Missions ordered by tavern level then name.
    #[must_use]
    pub fn missions(&self) -> &[MissionData] {
        &self.missions
    }

    /// Training data for a unit kind.
    #[must_use]
    pub fn unit(&self, kind: UnitKind) -> &UnitData {
        // Every kind is inserted at construction and never removed.
        &self.units[&kind]
    }

    /// Number of building kinds with catalog data.
    #[must_use]
    pub fn building_count(&self) -> usize {
        self.buildings.iter().filter(|(_, b)| b.is_some()).count()
    }

    /// Check the catalog for internal inconsistencies.
    ///
    /// An empty result means the catalog is consistent. Issues never stop
    /// the scheduler from running; they explain why a target may end up
    /// unreachable.
    #[must_use]
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for kind in BuildingKind::ALL {
            let Some(building) = self.building(kind) else {
                issues.push(CatalogIssue::MissingBuilding(kind));
                continue;
            };

            for level in 1..=building.max_level {
                let Some(data) = building.level(level) else {
                    issues.push(CatalogIssue::MissingLevel { kind, level });
                    continue;
                };
                let missing = match kind.role() {
                    BuildingRole::Producer(_) => data.production_rate.is_none(),
                    BuildingRole::Storage(_) | BuildingRole::Population => {
                        data.storage_capacity.is_none()
                    }
                    BuildingRole::Other => false,
                };
                if missing {
                    issues.push(CatalogIssue::MissingLevelEffect { kind, level });
                }
            }

            for (&level, technology) in &building.tech_prerequisites {
                if !self.technologies.contains_key(technology) {
                    issues.push(CatalogIssue::UnknownPrerequisite {
                        kind,
                        level,
                        technology: technology.clone(),
                    });
                }
            }
        }

        for unit in self.units.values() {
            if let Some(technology) = &unit.technology {
                if !self.technologies.contains_key(technology) {
                    issues.push(CatalogIssue::UnknownUnitTechnology {
                        unit: unit.kind,
                        technology: technology.clone(),
                    });
                }
            }
        }

        let mut seen = BTreeSet::new();
        for mission in &self.missions {
            if !seen.insert(mission.name.as_str()) {
                issues.push(CatalogIssue::DuplicateMission(mission.name.clone()));
            }
            if mission.duration_minutes == 0 {
                issues.push(CatalogIssue::ZeroDurationMission(mission.name.clone()));
            }
        }

        issues
    }
}

/// An inconsistency found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// No data at all for a building kind.
    MissingBuilding(BuildingKind),
    /// A level between 1 and the maximum has no data.
    MissingLevel {
        /// Building kind.
        kind: BuildingKind,
        /// Level without data.
        level: u32,
    },
    /// A producer level without a rate, or a store/farm level without a capacity.
    MissingLevelEffect {
        /// Building kind.
        kind: BuildingKind,
        /// Level missing its effect.
        level: u32,
    },
    /// A level gated by a technology the catalog does not define.
    UnknownPrerequisite {
        /// Building kind.
        kind: BuildingKind,
        /// Gated level.
        level: u32,
        /// Missing technology.
        technology: String,
    },
    /// A unit gated by a technology the catalog does not define.
    UnknownUnitTechnology {
        /// Unit kind.
        unit: UnitKind,
        /// Missing technology.
        technology: String,
    },
    /// Two missions share a name.
    DuplicateMission(String),
    /// A mission that takes no time.
    ZeroDurationMission(String),
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::MissingBuilding(kind) => write!(f, "no data for building {kind}"),
            CatalogIssue::MissingLevel { kind, level } => {
                write!(f, "{kind} has no data for level {level}")
            }
            CatalogIssue::MissingLevelEffect { kind, level } => {
                write!(f, "{kind} level {level} has no rate or capacity")
            }
            CatalogIssue::UnknownPrerequisite {
                kind,
                level,
                technology,
            } => write!(f, "{kind} level {level} requires unknown technology '{technology}'"),
            CatalogIssue::UnknownUnitTechnology { unit, technology } => {
                write!(f, "{unit} requires unknown technology '{technology}'")
            }
            CatalogIssue::DuplicateMission(name) => write!(f, "duplicate mission '{name}'"),
            CatalogIssue::ZeroDurationMission(name) => {
                write!(f, "mission '{name}' has zero duration")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RewardRange;
    use crate::resources::{Costs, Resource};

    fn mission(name: &str, tavern_level: u32) -> MissionData {
        MissionData {
            name: name.to_string(),
            tavern_level,
            max_tavern_level: 0,
            duration_minutes: 10,
            units_required: Vec::new(),
            resource_costs: Costs::ZERO,
            rewards: vec![RewardRange {
                resource: Resource::Wood,
                min: 1,
                max: 3,
            }],
        }
    }

    #[test]
    fn test_missions_sorted_by_tavern_then_name() {
        let catalog = Catalog::new().with_missions(vec![
            mission("Zeta", 1),
            mission("Beta", 2),
            mission("Alpha", 2),
        ]);
        let names: Vec<&str> = catalog.missions().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn test_unit_table_always_complete() {
        let catalog = Catalog::new();
        for kind in UnitKind::ALL {
            assert_eq!(catalog.unit(kind).kind, kind);
        }
    }

    #[test]
    fn test_validate_reports_gaps() {
        let keep = BuildingData::new(BuildingKind::Keep, 2)
            .with_level(
                1,
                BuildingLevelData {
                    costs: Costs::ZERO,
                    build_time_seconds: 0,
                    production_rate: None,
                    storage_capacity: None,
                },
            )
            .with_tech_prerequisite(2, "Masonry");
        let catalog = Catalog::new()
            .with_building(keep)
            .with_missions(vec![mission("Twice", 1), mission("Twice", 1)]);

        let issues = catalog.validate();
        assert!(issues.contains(&CatalogIssue::MissingLevel {
            kind: BuildingKind::Keep,
            level: 2
        }));
        assert!(issues.contains(&CatalogIssue::UnknownPrerequisite {
            kind: BuildingKind::Keep,
            level: 2,
            technology: "Masonry".to_string()
        }));
        assert!(issues.contains(&CatalogIssue::MissingBuilding(BuildingKind::Farm)));
        assert!(issues.contains(&CatalogIssue::DuplicateMission("Twice".to_string())));
        assert!(issues
            .iter()
            .any(|i| matches!(i, CatalogIssue::UnknownUnitTechnology { .. })));
    }

    #[test]
    fn test_issue_display() {
        let issue = CatalogIssue::MissingLevel {
            kind: BuildingKind::OreMine,
            level: 7,
        };
        assert_eq!(issue.to_string(), "ore_mine has no data for level 7");
    }
}
