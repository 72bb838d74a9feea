//! Game data loading from a data directory.
//!
//! A data directory holds the catalog in the formats exported from the
//! game:
//!
//! ```text
//! data/
//! ├── buildings.json                  (required)
//! ├── technology_prerequisites.json   (optional)
//! ├── technologies.json               (optional)
//! ├── missions.json                   (optional)
//! └── techs/                          (optional, one text file per technology)
//! ```
//!
//! Only `buildings.json` is fatal when missing. Everything else degrades
//! with a warning so a partial export can still be planned against.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use castle_core::prelude::{
    BuildingData, BuildingKind, BuildingLevelData, CastleConfig, CastleError, Catalog, Costs,
    InitialState, MissionData, Targets, TechData,
};

/// Environment variable that overrides the default data directory.
pub const DATA_DIR_ENV: &str = "CASTLE_DATA_DIR";

/// Errors that can occur while loading game data or a configuration.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// A required file or directory does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading a file failed.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document did not parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A RON document did not parse.
    #[error("invalid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// A technology text file is malformed.
    #[error("bad technology file '{file}': {reason}")]
    TechFile {
        /// File name inside `techs/`.
        file: String,
        /// What was wrong.
        reason: String,
    },

    /// The configuration parsed but does not fit the catalog.
    #[error("invalid configuration: {0}")]
    Config(#[from] CastleError),
}

// ============================================================================
// On-disk shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawBuilding {
    max_level: u32,
    #[serde(default)]
    levels: BTreeMap<String, RawLevel>,
}

#[derive(Debug, Deserialize)]
struct RawLevel {
    #[serde(default)]
    costs: Costs,
    #[serde(default)]
    build_time_seconds: u64,
    #[serde(default)]
    production_rate: Option<f64>,
    // Exported as a float even though capacities are whole numbers.
    #[serde(default)]
    storage_capacity: Option<f64>,
}

impl RawLevel {
    fn into_level(self) -> BuildingLevelData {
        BuildingLevelData {
            costs: self.costs,
            build_time_seconds: self.build_time_seconds,
            production_rate: self.production_rate,
            storage_capacity: self.storage_capacity.map(|cap| cap.max(0.0).round() as u32),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPrerequisite {
    #[serde(default)]
    library: u32,
    technology: String,
}

#[derive(Debug, Deserialize)]
struct RawTechnologyInfo {
    #[serde(default)]
    required_library_level: u32,
}

// ============================================================================
// Catalog
// ============================================================================

/// Resolve the data directory: the explicit path if given, else
/// `$CASTLE_DATA_DIR`, else `data`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var_os(DATA_DIR_ENV).map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

/// Load the full catalog from a data directory.
pub fn load_catalog(dir: &Path) -> Result<Catalog, CatalogLoadError> {
    let mut buildings = load_buildings(dir)?;
    let prerequisites = load_prerequisites(dir);
    let mut technologies = load_technologies(dir);

    for (kind, gates) in &prerequisites {
        for (&level, gate) in gates {
            if let Some(building) = buildings.get_mut(kind) {
                building
                    .tech_prerequisites
                    .insert(level, gate.technology.clone());
            }
            if let Some(tech) = technologies.get_mut(&gate.technology) {
                if tech.enables.is_none() {
                    tech.enables = Some((*kind, level));
                }
                tech.required_library_level = tech.required_library_level.max(gate.library);
            }
        }
    }
    apply_library_levels(dir, &mut technologies);

    let mut catalog = Catalog::new();
    for building in buildings.into_values() {
        catalog.insert_building(building);
    }
    for tech in technologies.into_values() {
        catalog.insert_technology(tech);
    }
    catalog.set_missions(load_missions(dir));

    info!(
        "Loaded catalog from {}: {} buildings, {} technologies, {} missions",
        dir.display(),
        catalog.building_count(),
        catalog.technology_count(),
        catalog.missions().len()
    );
    Ok(catalog)
}

/// Parse `buildings.json`. Unknown building names are skipped.
pub fn load_buildings(dir: &Path) -> Result<BTreeMap<BuildingKind, BuildingData>, CatalogLoadError> {
    let path = dir.join("buildings.json");
    if !path.is_file() {
        return Err(CatalogLoadError::NotFound(path));
    }
    let raw: BTreeMap<String, RawBuilding> = serde_json::from_str(&fs::read_to_string(&path)?)?;

    let mut buildings = BTreeMap::new();
    for (name, raw_building) in raw {
        let Some(kind) = BuildingKind::from_name(&name) else {
            warn!("Skipping unknown building '{}' in {}", name, path.display());
            continue;
        };
        let mut data = BuildingData::new(kind, raw_building.max_level);
        for (level, raw_level) in raw_building.levels {
            let Ok(number) = level.parse::<u32>() else {
                warn!("Skipping level '{}' of {}: not a number", level, name);
                continue;
            };
            data.levels.insert(number, raw_level.into_level());
        }
        buildings.insert(kind, data);
    }
    Ok(buildings)
}

fn load_prerequisites(dir: &Path) -> BTreeMap<BuildingKind, BTreeMap<u32, RawPrerequisite>> {
    let path = dir.join("technology_prerequisites.json");
    let raw: BTreeMap<String, BTreeMap<String, RawPrerequisite>> = match read_json(&path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not load technology prerequisites: {}", e);
            return BTreeMap::new();
        }
    };

    let mut out = BTreeMap::new();
    for (name, levels) in raw {
        let Some(kind) = BuildingKind::from_name(&name) else {
            warn!("Skipping prerequisites for unknown building '{}'", name);
            continue;
        };
        let gates: BTreeMap<u32, RawPrerequisite> = levels
            .into_iter()
            .filter_map(|(level, gate)| level.parse().ok().map(|level| (level, gate)))
            .collect();
        out.insert(kind, gates);
    }
    out
}

/// Parse every file in `techs/`. A missing directory yields no technologies.
pub fn load_technologies(dir: &Path) -> BTreeMap<String, TechData> {
    let techs_dir = dir.join("techs");
    let entries = match fs::read_dir(&techs_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("No technologies loaded from {}: {}", techs_dir.display(), e);
            return BTreeMap::new();
        }
    };

    // read_dir order is platform-defined; sort for stable warnings.
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut technologies = BTreeMap::new();
    for path in paths {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = fs::read_to_string(&path)
            .map_err(CatalogLoadError::from)
            .and_then(|text| parse_tech_file(&file, &text));
        match parsed {
            Ok(tech) => {
                technologies.insert(tech.name.clone(), tech);
            }
            Err(e) => warn!("Skipping technology file: {}", e),
        }
    }
    technologies
}

fn apply_library_levels(dir: &Path, technologies: &mut BTreeMap<String, TechData>) {
    let path = dir.join("technologies.json");
    let raw: BTreeMap<String, RawTechnologyInfo> = match read_json(&path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not load technology library levels: {}", e);
            return;
        }
    };
    for (name, info) in raw {
        if let Some(tech) = technologies.get_mut(&name) {
            if info.required_library_level > 0 {
                tech.required_library_level = info.required_library_level;
            }
        }
    }
}

/// Parse `missions.json`. A missing file means no missions.
pub fn load_missions(dir: &Path) -> Vec<MissionData> {
    let path = dir.join("missions.json");
    if !path.is_file() {
        return Vec::new();
    }
    match read_json::<BTreeMap<String, MissionData>>(&path) {
        Ok(missions) => missions.into_values().collect(),
        Err(e) => {
            warn!("Could not load missions: {}", e);
            Vec::new()
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogLoadError> {
    if !path.is_file() {
        return Err(CatalogLoadError::NotFound(path.to_path_buf()));
    }
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

// ============================================================================
// Technology text files
// ============================================================================

/// Parse one technology export.
///
/// The first line is the name. A `HH:MM:SS` line gives the research time,
/// bare integers are costs in the order wood, stone, iron, food, and a
/// `Farm Level N` line records the farm level the technology unlocks.
/// Anything else is ignored.
pub fn parse_tech_file(file: &str, text: &str) -> Result<TechData, CatalogLoadError> {
    let mut lines = text.lines().map(str::trim);
    let name = lines.next().unwrap_or_default();
    if name.is_empty() {
        return Err(CatalogLoadError::TechFile {
            file: file.to_string(),
            reason: "missing name line".to_string(),
        });
    }

    let mut seconds = 0;
    let mut amounts: Vec<u32> = Vec::new();
    let mut enables = None;
    for line in lines {
        if let Some(parsed) = parse_hms(line) {
            seconds = parsed;
        } else if let Some(rest) = line.strip_prefix("Farm Level") {
            if let Ok(level) = rest.trim().parse() {
                enables = Some((BuildingKind::Farm, level));
            }
        } else if let Ok(amount) = line.parse() {
            amounts.push(amount);
        }
    }

    let amount = |i: usize| amounts.get(i).copied().unwrap_or(0);
    let costs = Costs::new(amount(0), amount(1), amount(2), amount(3));
    let mut tech = TechData::new(name, costs, seconds);
    tech.internal_name = file.to_string();
    tech.enables = enables;
    Ok(tech)
}

fn parse_hms(line: &str) -> Option<u64> {
    let bytes = line.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    let field = |range: std::ops::Range<usize>| -> Option<u64> {
        let part = &line[range];
        part.bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| part.parse().ok())
            .flatten()
    };
    Some(field(0..2)? * 3600 + field(3..5)? * 60 + field(6..8)?)
}

// ============================================================================
// Configuration
// ============================================================================

/// Read a configuration file, RON when the extension is `.ron`, else JSON.
pub fn load_config(path: &Path) -> Result<CastleConfig, CatalogLoadError> {
    if !path.is_file() {
        return Err(CatalogLoadError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let is_ron = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));
    let config = if is_ron {
        ron::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    Ok(config)
}

/// The solver inputs for an optional configuration file.
///
/// Without a file every building starts at level 1 with the default
/// stock, aiming for the default castle.
pub fn problem_from_config(
    config: Option<&CastleConfig>,
    catalog: &Catalog,
) -> Result<(InitialState, Targets), CatalogLoadError> {
    match config {
        Some(config) => Ok((config.initial_state(catalog)?, config.targets(catalog)?)),
        None => Ok((InitialState::default(), Targets::default_castle())),
    }
}
