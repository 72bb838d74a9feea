//! Unit training data.

use serde::{Deserialize, Serialize};

use crate::resources::Costs;
use crate::units::UnitKind;

/// Training definition for one unit kind.
///
/// The built-in table is used unless the catalog directory ships a
/// `units.json` override.
///
/// # Example JSON
///
/// ```json
/// {
///     "kind": "archer",
///     "costs": { "wood": 27, "stone": 12, "iron": 39, "food": 1 },
///     "training_time_seconds": 900,
///     "technology": "Longbow"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitData {
    /// The unit kind this entry defines.
    pub kind: UnitKind,

    /// Resource cost plus permanent population usage.
    pub costs: Costs,

    /// Time the training queue is busy per unit.
    pub training_time_seconds: u64,

    /// Technology that must be researched before training.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
}

impl UnitData {
    /// Built-in definition for a unit kind.
    #[must_use]
    pub fn builtin(kind: UnitKind) -> Self {
        let (costs, seconds, technology) = match kind {
            UnitKind::Spearman => (Costs::new(18, 6, 30, 1), 750, None),
            UnitKind::Swordsman => (Costs::new(43, 20, 48, 1), 1200, Some("Swordsmith")),
            UnitKind::Archer => (Costs::new(27, 12, 39, 1), 900, Some("Longbow")),
            UnitKind::Crossbowman => (Costs::new(50, 28, 55, 1), 1350, Some("Crossbow")),
            UnitKind::Horseman => (Costs::new(25, 15, 45, 2), 1050, None),
            UnitKind::Lancer => (Costs::new(70, 60, 80, 2), 1860, Some("Horse armour")),
        };
        Self {
            kind,
            costs,
            training_time_seconds: seconds,
            technology: technology.map(str::to_string),
        }
    }

    /// Population used by one unit.
    #[must_use]
    pub const fn food(&self) -> u32 {
        self.costs.food
    }
}
