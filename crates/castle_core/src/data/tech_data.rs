//! Technology definitions.

use serde::{Deserialize, Serialize};

use crate::buildings::BuildingKind;
use crate::resources::Costs;

/// Production multiplier gained per researched production technology.
pub const PRODUCTION_BONUS_STEP: f64 = 0.05;

/// Technologies that raise the production multiplier.
pub const PRODUCTION_TECHNOLOGIES: [&str; 2] = ["Beer tester", "Wheelbarrow"];

/// A researchable technology.
///
/// # Example JSON
///
/// ```json
/// {
///     "name": "Crop rotation",
///     "internal_name": "crop_rotation.txt",
///     "required_library_level": 3,
///     "costs": { "wood": 400, "stone": 300, "iron": 250, "food": 0 },
///     "research_time_seconds": 7200,
///     "enables": ["farm", 11]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechData {
    /// Display name, also the key used by prerequisites.
    pub name: String,

    /// Source identifier (the file the definition was read from).
    #[serde(default)]
    pub internal_name: String,

    /// Library level needed before research can start.
    #[serde(default = "default_library_level")]
    pub required_library_level: u32,

    /// Research cost.
    #[serde(default)]
    pub costs: Costs,

    /// Time the research queue is busy.
    #[serde(default)]
    pub research_time_seconds: u64,

    /// Building level this technology unlocks, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enables: Option<(BuildingKind, u32)>,
}

/// Default library level for technologies without an explicit gate.
const fn default_library_level() -> u32 {
    1
}

impl TechData {
    /// Create a technology gated at library level 1.
    #[must_use]
    pub fn new(name: impl Into<String>, costs: Costs, research_time_seconds: u64) -> Self {
        let name = name.into();
        Self {
            internal_name: name.clone(),
            name,
            required_library_level: default_library_level(),
            costs,
            research_time_seconds,
            enables: None,
        }
    }

    /// Set the library gate, builder style.
    #[must_use]
    pub fn with_library_level(mut self, level: u32) -> Self {
        self.required_library_level = level;
        self
    }

    /// Whether researching this raises the production multiplier.
    #[must_use]
    pub fn boosts_production(&self) -> bool {
        is_production_technology(&self.name)
    }

    /// Research time in hours.
    #[must_use]
    pub fn research_hours(&self) -> f64 {
        self.research_time_seconds as f64 / 3600.0
    }
}

/// Whether a technology name is one of the production technologies.
#[must_use]
pub fn is_production_technology(name: &str) -> bool {
    PRODUCTION_TECHNOLOGIES.contains(&name)
}
