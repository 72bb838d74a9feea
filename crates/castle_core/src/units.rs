//! Unit kinds and army rosters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CastleError;

/// A trainable unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Basic infantry.
    Spearman,
    /// Heavy infantry.
    Swordsman,
    /// Basic ranged unit.
    Archer,
    /// Heavy ranged unit.
    Crossbowman,
    /// Basic cavalry.
    Horseman,
    /// Heavy cavalry.
    Lancer,
}

impl UnitKind {
    /// Every unit kind in declaration order.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Spearman,
        UnitKind::Swordsman,
        UnitKind::Archer,
        UnitKind::Crossbowman,
        UnitKind::Horseman,
        UnitKind::Lancer,
    ];

    /// Number of unit kinds.
    pub const COUNT: usize = 6;

    /// Position in fixed-size arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnitKind::Spearman => "spearman",
            UnitKind::Swordsman => "swordsman",
            UnitKind::Archer => "archer",
            UnitKind::Crossbowman => "crossbowman",
            UnitKind::Horseman => "horseman",
            UnitKind::Lancer => "lancer",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitKind {
    type Err = CastleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CastleError::UnknownUnit {
            field: "unit".to_string(),
            name: s.to_string(),
        })
    }
}

/// Unit counts per kind.
///
/// Used both for the available roster and for units away on missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Army(pub [u32; UnitKind::COUNT]);

impl Army {
    /// An empty roster.
    pub const EMPTY: Army = Army([0; UnitKind::COUNT]);

    /// Count of one kind.
    #[must_use]
    pub const fn get(&self, kind: UnitKind) -> u32 {
        self.0[kind.index()]
    }

    /// Set the count of one kind.
    pub fn set(&mut self, kind: UnitKind, count: u32) {
        self.0[kind.index()] = count;
    }

    /// Add units of one kind.
    pub fn add(&mut self, kind: UnitKind, count: u32) {
        self.0[kind.index()] = self.0[kind.index()].saturating_add(count);
    }

    /// Remove units of one kind, stopping at zero.
    pub fn remove(&mut self, kind: UnitKind, count: u32) {
        self.0[kind.index()] = self.0[kind.index()].saturating_sub(count);
    }

    /// Whether at least `count` units of `kind` are present.
    #[must_use]
    pub const fn has(&self, kind: UnitKind, count: u32) -> bool {
        self.0[kind.index()] >= count
    }

    /// Total number of units.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Iterate `(kind, count)` pairs with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (UnitKind, u32)> + '_ {
        UnitKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|&(_, n)| n > 0)
    }

    /// Sum of two rosters.
    #[must_use]
    pub fn combined(&self, other: &Army) -> Army {
        let mut out = *self;
        for kind in UnitKind::ALL {
            out.add(kind, other.get(kind));
        }
        out
    }
}
