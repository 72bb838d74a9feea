//! Actions the scheduler can start on its queues.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buildings::BuildingKind;
use crate::error::CastleError;
use crate::units::UnitKind;

/// The three serial work queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Building upgrades.
    Building,
    /// Technology research.
    Research,
    /// Unit training.
    Training,
}

impl QueueKind {
    /// Label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            QueueKind::Building => "Building",
            QueueKind::Research => "Research",
            QueueKind::Training => "Training",
        }
    }
}

/// A single-level building upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingUpgrade {
    /// Upgraded building.
    pub kind: BuildingKind,
    /// Level before the upgrade.
    pub from_level: u32,
    /// Level after the upgrade.
    pub to_level: u32,
}

impl BuildingUpgrade {
    /// The upgrade from `current` to `current + 1`.
    #[must_use]
    pub const fn next(kind: BuildingKind, current: u32) -> Self {
        Self {
            kind,
            from_level: current,
            to_level: current + 1,
        }
    }
}

impl fmt::Display for BuildingUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}",
            self.kind.display_name(),
            self.from_level,
            self.to_level
        )
    }
}

/// The action a player should start right now.
///
/// Rendered as a single token: `building:<name>:<to_level>`,
/// `research:<name>`, `train:<unit>` or `none`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NextAction {
    /// Start a building upgrade.
    Building(BuildingUpgrade),
    /// Start researching a technology.
    Research {
        /// Technology name.
        technology: String,
    },
    /// Start training a unit.
    Train {
        /// Unit kind.
        unit: UnitKind,
    },
    /// Nothing to start.
    #[serde(rename = "none")]
    Idle,
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAction::Building(upgrade) => {
                write!(f, "building:{}:{}", upgrade.kind.name(), upgrade.to_level)
            }
            NextAction::Research { technology } => write!(f, "research:{technology}"),
            NextAction::Train { unit } => write!(f, "train:{}", unit.name()),
            NextAction::Idle => f.write_str("none"),
        }
    }
}

impl FromStr for NextAction {
    type Err = CastleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || CastleError::DataParseError {
            source_name: "next action".to_string(),
            message: format!("unrecognised token '{s}'"),
        };

        if s == "none" {
            return Ok(NextAction::Idle);
        }
        if let Some(technology) = s.strip_prefix("research:") {
            return Ok(NextAction::Research {
                technology: technology.to_string(),
            });
        }
        if let Some(unit) = s.strip_prefix("train:") {
            return Ok(NextAction::Train { unit: unit.parse()? });
        }
        if let Some(rest) = s.strip_prefix("building:") {
            let (name, level) = rest.rsplit_once(':').ok_or_else(parse_error)?;
            let kind: BuildingKind = name.parse()?;
            let to_level: u32 = level.parse().map_err(|_| parse_error())?;
            if to_level == 0 {
                return Err(parse_error());
            }
            return Ok(NextAction::Building(BuildingUpgrade::next(kind, to_level - 1)));
        }
        Err(parse_error())
    }
}
