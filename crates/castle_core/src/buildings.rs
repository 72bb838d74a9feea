//! Building kinds and per-building storage.
//!
//! The castle has a fixed set of thirteen building kinds. Each kind plays one
//! role in the economy: producers raise a resource's hourly rate, stores raise
//! its storage cap, the farm raises population capacity, and the rest only
//! matter as upgrade targets.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CastleError;
use crate::resources::Resource;

// ============================================================================
// Building Kind
// ============================================================================

/// One of the thirteen building kinds.
///
/// Declaration order is significant: it is the scan order used when looking
/// for technologies that block a target level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Wood producer.
    Lumberjack,
    /// Stone producer.
    Quarry,
    /// Iron producer.
    OreMine,
    /// Population building.
    Farm,
    /// Wood storage.
    WoodStore,
    /// Stone storage.
    StoneStore,
    /// Iron storage.
    OreStore,
    /// Main castle building.
    Keep,
    /// Unlocks unit training.
    Arsenal,
    /// Gates technology research.
    Library,
    /// Unlocks missions.
    Tavern,
    /// Trade building.
    Market,
    /// Walls and towers.
    Fortifications,
}

/// What a building contributes to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingRole {
    /// Raises the hourly production rate of a resource.
    Producer(Resource),
    /// Raises the storage cap of a resource.
    Storage(Resource),
    /// Raises population capacity.
    Population,
    /// No direct effect on the economy.
    Other,
}

impl BuildingKind {
    /// Every building kind in declaration order.
    pub const ALL: [BuildingKind; 13] = [
        BuildingKind::Lumberjack,
        BuildingKind::Quarry,
        BuildingKind::OreMine,
        BuildingKind::Farm,
        BuildingKind::WoodStore,
        BuildingKind::StoneStore,
        BuildingKind::OreStore,
        BuildingKind::Keep,
        BuildingKind::Arsenal,
        BuildingKind::Library,
        BuildingKind::Tavern,
        BuildingKind::Market,
        BuildingKind::Fortifications,
    ];

    /// Number of building kinds.
    pub const COUNT: usize = 13;

    /// Position of this kind in fixed-size arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name (snake_case).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BuildingKind::Lumberjack => "lumberjack",
            BuildingKind::Quarry => "quarry",
            BuildingKind::OreMine => "ore_mine",
            BuildingKind::Farm => "farm",
            BuildingKind::WoodStore => "wood_store",
            BuildingKind::StoneStore => "stone_store",
            BuildingKind::OreStore => "ore_store",
            BuildingKind::Keep => "keep",
            BuildingKind::Arsenal => "arsenal",
            BuildingKind::Library => "library",
            BuildingKind::Tavern => "tavern",
            BuildingKind::Market => "market",
            BuildingKind::Fortifications => "fortifications",
        }
    }

    /// Human-readable name for reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            BuildingKind::Lumberjack => "Lumberjack",
            BuildingKind::Quarry => "Quarry",
            BuildingKind::OreMine => "Ore Mine",
            BuildingKind::Farm => "Farm",
            BuildingKind::WoodStore => "Wood Store",
            BuildingKind::StoneStore => "Stone Store",
            BuildingKind::OreStore => "Ore Store",
            BuildingKind::Keep => "Keep",
            BuildingKind::Arsenal => "Arsenal",
            BuildingKind::Library => "Library",
            BuildingKind::Tavern => "Tavern",
            BuildingKind::Market => "Market",
            BuildingKind::Fortifications => "Fortifications",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The economic role of this kind.
    #[must_use]
    pub const fn role(self) -> BuildingRole {
        match self {
            BuildingKind::Lumberjack => BuildingRole::Producer(Resource::Wood),
            BuildingKind::Quarry => BuildingRole::Producer(Resource::Stone),
            BuildingKind::OreMine => BuildingRole::Producer(Resource::Iron),
            BuildingKind::WoodStore => BuildingRole::Storage(Resource::Wood),
            BuildingKind::StoneStore => BuildingRole::Storage(Resource::Stone),
            BuildingKind::OreStore => BuildingRole::Storage(Resource::Iron),
            BuildingKind::Farm => BuildingRole::Population,
            _ => BuildingRole::Other,
        }
    }

    /// The resource this building produces, if it is a producer.
    #[must_use]
    pub const fn produces(self) -> Option<Resource> {
        match self.role() {
            BuildingRole::Producer(resource) => Some(resource),
            _ => None,
        }
    }

    /// The producer building for a resource.
    #[must_use]
    pub const fn producer_of(resource: Resource) -> Self {
        match resource {
            Resource::Wood => BuildingKind::Lumberjack,
            Resource::Stone => BuildingKind::Quarry,
            Resource::Iron => BuildingKind::OreMine,
        }
    }

    /// The storage building for a resource.
    #[must_use]
    pub const fn store_of(resource: Resource) -> Self {
        match resource {
            Resource::Wood => BuildingKind::WoodStore,
            Resource::Stone => BuildingKind::StoneStore,
            Resource::Iron => BuildingKind::OreStore,
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildingKind {
    type Err = CastleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CastleError::UnknownBuilding {
            field: "building".to_string(),
            name: s.to_string(),
        })
    }
}

// ============================================================================
// Per-building storage
// ============================================================================

/// One value per building kind, stored in a fixed-size array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerBuilding<T>(pub [T; BuildingKind::COUNT]);

impl<T> PerBuilding<T> {
    /// Build a table by calling `f` for every kind in declaration order.
    pub fn from_fn(mut f: impl FnMut(BuildingKind) -> T) -> Self {
        Self(std::array::from_fn(|i| f(BuildingKind::ALL[i])))
    }

    /// Iterate `(kind, &value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (BuildingKind, &T)> {
        BuildingKind::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Copy> PerBuilding<T> {
    /// The same value for every kind.
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self([value; BuildingKind::COUNT])
    }
}

impl<T> Index<BuildingKind> for PerBuilding<T> {
    type Output = T;

    fn index(&self, kind: BuildingKind) -> &T {
        &self.0[kind.index()]
    }
}

impl<T> IndexMut<BuildingKind> for PerBuilding<T> {
    fn index_mut(&mut self, kind: BuildingKind) -> &mut T {
        &mut self.0[kind.index()]
    }
}

/// Current level of every building.
pub type BuildingLevels = PerBuilding<u32>;

impl BuildingLevels {
    /// Every building at level 1.
    #[must_use]
    pub const fn starting() -> Self {
        Self::splat(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, kind) in BuildingKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for kind in BuildingKind::ALL {
            assert_eq!(kind.name().parse::<BuildingKind>().unwrap(), kind);
        }
        assert!("castle".parse::<BuildingKind>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&BuildingKind::OreMine).unwrap();
        assert_eq!(json, "\"ore_mine\"");
        let kind: BuildingKind = serde_json::from_str("\"stone_store\"").unwrap();
        assert_eq!(kind, BuildingKind::StoneStore);
    }

    #[test]
    fn test_roles() {
        for resource in Resource::ALL {
            let producer = BuildingKind::producer_of(resource);
            assert_eq!(producer.role(), BuildingRole::Producer(resource));
            assert_eq!(producer.produces(), Some(resource));
            assert_eq!(
                BuildingKind::store_of(resource).role(),
                BuildingRole::Storage(resource)
            );
        }
        assert_eq!(BuildingKind::Farm.role(), BuildingRole::Population);
        assert_eq!(BuildingKind::Keep.role(), BuildingRole::Other);
        assert_eq!(BuildingKind::Keep.produces(), None);
    }

    #[test]
    fn test_per_building_indexing() {
        let mut levels = BuildingLevels::starting();
        levels[BuildingKind::Tavern] = 4;
        assert_eq!(levels[BuildingKind::Tavern], 4);
        assert_eq!(levels[BuildingKind::Keep], 1);

        let doubled = PerBuilding::from_fn(|kind| levels[kind] * 2);
        assert_eq!(doubled[BuildingKind::Tavern], 8);
        assert_eq!(doubled.iter().count(), BuildingKind::COUNT);
    }
}
