//! Run configuration: the starting snapshot and the targets.
//!
//! [`CastleConfig`] is the user-facing, name-keyed form read from JSON or
//! RON. It is validated against a [`Catalog`] and turned into the typed
//! [`InitialState`] and [`Targets`] the solver works with.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingKind, BuildingLevels, PerBuilding};
use crate::catalog::Catalog;
use crate::error::{CastleError, Result};
use crate::resources::{PerResource, Resource, FOOD};
use crate::units::{Army, UnitKind};

/// Starting stock of each produced resource when none is given.
pub const DEFAULT_STOCK: f64 = 120.0;

/// Starting food entry reported when none is given.
pub const DEFAULT_FOOD: f64 = 40.0;

// ============================================================================
// Typed problem description
// ============================================================================

/// Snapshot the simulation starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    /// Current level of every building.
    pub levels: BuildingLevels,
    /// Stock of each produced resource.
    pub stock: PerResource<f64>,
    /// Technologies already researched.
    pub researched: BTreeSet<String>,
    /// Units available at the start.
    pub army: Army,
    /// Population already consumed.
    pub food_used: u32,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            levels: BuildingLevels::starting(),
            stock: PerResource::splat(DEFAULT_STOCK),
            researched: BTreeSet::new(),
            army: Army::EMPTY,
            food_used: 0,
        }
    }
}

impl InitialState {
    /// Set one building level, builder style.
    #[must_use]
    pub fn with_level(mut self, kind: BuildingKind, level: u32) -> Self {
        self.levels[kind] = level;
        self
    }

    /// Set one resource stock, builder style.
    #[must_use]
    pub fn with_stock(mut self, resource: Resource, amount: f64) -> Self {
        self.stock[resource] = amount;
        self
    }

    /// Mark a technology as researched, builder style.
    #[must_use]
    pub fn with_researched(mut self, technology: impl Into<String>) -> Self {
        self.researched.insert(technology.into());
        self
    }
}

/// What the run should reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    /// Target level per building; `None` means no target.
    pub buildings: PerBuilding<Option<u32>>,
    /// Technologies that must be researched.
    pub technologies: BTreeSet<String>,
    /// Unit counts that must be trained.
    pub units: Army,
}

impl Default for Targets {
    fn default() -> Self {
        Self::none()
    }
}

impl Targets {
    /// No targets at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            buildings: PerBuilding::splat(None),
            technologies: BTreeSet::new(),
            units: Army::EMPTY,
        }
    }

    /// The fully developed castle.
    #[must_use]
    pub fn default_castle() -> Self {
        let buildings = PerBuilding::from_fn(|kind| {
            Some(match kind {
                BuildingKind::Lumberjack
                | BuildingKind::Quarry
                | BuildingKind::OreMine
                | BuildingKind::Farm
                | BuildingKind::Arsenal => 30,
                BuildingKind::WoodStore
                | BuildingKind::StoneStore
                | BuildingKind::OreStore
                | BuildingKind::Fortifications => 20,
                BuildingKind::Keep | BuildingKind::Library | BuildingKind::Tavern => 10,
                BuildingKind::Market => 8,
            })
        });
        Self {
            buildings,
            ..Self::none()
        }
    }

    /// Set a building target, builder style.
    #[must_use]
    pub fn with_building(mut self, kind: BuildingKind, level: u32) -> Self {
        self.buildings[kind] = Some(level);
        self
    }

    /// Add a technology target, builder style.
    #[must_use]
    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technologies.insert(technology.into());
        self
    }

    /// Add a unit target, builder style.
    #[must_use]
    pub fn with_units(mut self, kind: UnitKind, count: u32) -> Self {
        self.units.add(kind, count);
        self
    }

    /// Target level for a building.
    #[must_use]
    pub fn building(&self, kind: BuildingKind) -> Option<u32> {
        self.buildings[kind]
    }

    /// Whether no building target is set.
    #[must_use]
    pub fn has_building_targets(&self) -> bool {
        self.buildings.iter().any(|(_, t)| t.is_some())
    }
}

// ============================================================================
// User-facing configuration
// ============================================================================

/// Name-keyed run configuration.
///
/// # Example JSON
///
/// ```json
/// {
///     "building_levels": { "lumberjack": 5, "quarry": 5, "...": 1 },
///     "resources": { "wood": 500, "stone": 400, "iron": 300 },
///     "researched_technologies": ["Longbow"],
///     "targets": { "lumberjack": 10 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastleConfig {
    /// Current level of every building; all thirteen are required.
    pub building_levels: BTreeMap<String, u32>,

    /// Starting stock; missing entries use the defaults.
    pub resources: BTreeMap<String, f64>,

    /// Technologies already researched.
    pub researched_technologies: Vec<String>,

    /// Units available at the start.
    pub army: BTreeMap<String, u32>,

    /// Population already consumed.
    pub food_used: u32,

    /// Target levels; the default castle when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<BTreeMap<String, u32>>,

    /// Unit counts to train.
    pub target_units: BTreeMap<String, u32>,

    /// Technologies to research.
    pub target_technologies: Vec<String>,
}

impl CastleConfig {
    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CastleError::DataParseError {
            source_name: "config (json)".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a RON configuration.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| CastleError::DataParseError {
            source_name: "config (ron)".to_string(),
            message: e.to_string(),
        })
    }

    /// Check the configuration without building anything.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        self.initial_state(catalog)?;
        self.targets(catalog)?;
        Ok(())
    }

    /// Build the typed starting snapshot.
    pub fn initial_state(&self, catalog: &Catalog) -> Result<InitialState> {
        for name in self.building_levels.keys() {
            parse_building("building_levels", name)?;
        }

        let mut levels = BuildingLevels::starting();
        for kind in BuildingKind::ALL {
            let level = *self
                .building_levels
                .get(kind.name())
                .ok_or_else(|| CastleError::MissingBuildingLevel(kind.name().to_string()))?;
            check_level(catalog, "building_levels", kind, level)?;
            levels[kind] = level;
        }

        let mut stock = PerResource::splat(DEFAULT_STOCK);
        for (name, &amount) in &self.resources {
            if !amount.is_finite() || amount < 0.0 {
                return Err(CastleError::InvalidAmount {
                    field: "resources".to_string(),
                    resource: name.clone(),
                    amount,
                });
            }
            if name == FOOD {
                // Population is derived from the farm; the entry is informational.
                continue;
            }
            let resource =
                Resource::from_name(name).ok_or_else(|| CastleError::UnknownResource {
                    field: "resources".to_string(),
                    name: name.clone(),
                })?;
            stock[resource] = amount;
        }

        Ok(InitialState {
            levels,
            stock,
            researched: self.researched_technologies.iter().cloned().collect(),
            army: parse_army("army", &self.army)?,
            food_used: self.food_used,
        })
    }

    /// Build the typed targets.
    pub fn targets(&self, catalog: &Catalog) -> Result<Targets> {
        let mut targets = match &self.targets {
            None => Targets::default_castle(),
            Some(map) => {
                let mut targets = Targets::none();
                for (name, &level) in map {
                    let kind = parse_building("targets", name)?;
                    check_level(catalog, "targets", kind, level)?;
                    targets.buildings[kind] = Some(level);
                }
                targets
            }
        };

        targets.units = parse_army("target_units", &self.target_units)?;

        for name in &self.target_technologies {
            if catalog.technology(name).is_none() {
                return Err(CastleError::UnknownTechnology {
                    field: "target_technologies".to_string(),
                    name: name.clone(),
                });
            }
            targets.technologies.insert(name.clone());
        }

        Ok(targets)
    }
}

fn parse_building(field: &str, name: &str) -> Result<BuildingKind> {
    BuildingKind::from_name(name).ok_or_else(|| CastleError::UnknownBuilding {
        field: field.to_string(),
        name: name.to_string(),
    })
}

fn parse_army(field: &str, map: &BTreeMap<String, u32>) -> Result<Army> {
    let mut army = Army::EMPTY;
    for (name, &count) in map {
        let kind = UnitKind::from_name(name).ok_or_else(|| CastleError::UnknownUnit {
            field: field.to_string(),
            name: name.clone(),
        })?;
        army.add(kind, count);
    }
    Ok(army)
}

/// Levels above the catalog maximum are rejected; kinds without data pass.
fn check_level(catalog: &Catalog, field: &str, kind: BuildingKind, level: u32) -> Result<()> {
    match catalog.max_level(kind) {
        Some(max) if level > max => Err(CastleError::InvalidLevel {
            field: field.to_string(),
            building: kind.name().to_string(),
            level,
            max,
        }),
        _ => Ok(()),
    }
}
