//! Resource kinds, upgrade costs, and per-resource storage.
//!
//! Three resources are produced continuously and stored up to a cap. Food is
//! a capacity-only quantity: it is never produced, only consumed against the
//! population ceiling set by the farm, so it lives in [`Costs`] but not in
//! [`PerResource`].

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut};

use serde::{Deserialize, Serialize};

/// A continuously produced, storage-capped resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Produced by the lumberjack, stored in the wood store.
    Wood,
    /// Produced by the quarry, stored in the stone store.
    Stone,
    /// Produced by the ore mine, stored in the ore store.
    Iron,
}

impl Resource {
    /// Every produced resource, in canonical order.
    pub const ALL: [Resource; 3] = [Resource::Wood, Resource::Stone, Resource::Iron];

    /// Number of produced resources.
    pub const COUNT: usize = 3;

    /// Position of this resource in fixed-size arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Resource::Wood => 0,
            Resource::Stone => 1,
            Resource::Iron => 2,
        }
    }

    /// Wire name of this resource.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Resource::Wood => "wood",
            Resource::Stone => "stone",
            Resource::Iron => "iron",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Demand share assumed by the fixed scarcity model (40/40/20).
    #[must_use]
    pub const fn assumed_demand_share(self) -> f64 {
        match self {
            Resource::Wood | Resource::Stone => 0.4,
            Resource::Iron => 0.2,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire name of the population quantity.
pub const FOOD: &str = "food";

/// Resource and population cost of an action.
///
/// # Example JSON
///
/// ```json
/// { "wood": 50, "stone": 60, "iron": 40, "food": 1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Costs {
    /// Wood cost.
    #[serde(default)]
    pub wood: u32,
    /// Stone cost.
    #[serde(default)]
    pub stone: u32,
    /// Iron cost.
    #[serde(default)]
    pub iron: u32,
    /// Population cost (consumed permanently against capacity).
    #[serde(default)]
    pub food: u32,
}

impl Costs {
    /// A cost of nothing.
    pub const ZERO: Costs = Costs::new(0, 0, 0, 0);

    /// Create a cost.
    #[must_use]
    pub const fn new(wood: u32, stone: u32, iron: u32, food: u32) -> Self {
        Self {
            wood,
            stone,
            iron,
            food,
        }
    }

    /// Cost in a single produced resource.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
            Resource::Iron => self.iron,
        }
    }

    /// Sum of the three produced-resource costs (food excluded).
    #[must_use]
    pub const fn total_resources(&self) -> u64 {
        self.wood as u64 + self.stone as u64 + self.iron as u64
    }

    /// The cost of `count` repetitions of this cost.
    #[must_use]
    pub const fn times(&self, count: u32) -> Self {
        Self::new(
            self.wood.saturating_mul(count),
            self.stone.saturating_mul(count),
            self.iron.saturating_mul(count),
            self.food.saturating_mul(count),
        )
    }
}

impl Add for Costs {
    type Output = Costs;

    fn add(self, rhs: Self) -> Self::Output {
        Costs::new(
            self.wood.saturating_add(rhs.wood),
            self.stone.saturating_add(rhs.stone),
            self.iron.saturating_add(rhs.iron),
            self.food.saturating_add(rhs.food),
        )
    }
}

impl AddAssign for Costs {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// One value per produced resource, stored in a fixed-size array.
///
/// Iteration always follows [`Resource::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerResource<T>(pub [T; Resource::COUNT]);

impl<T: Copy> PerResource<T> {
    /// The same value for every resource.
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self([value; Resource::COUNT])
    }

    /// Iterate `(resource, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, T)> + '_ {
        Resource::ALL.into_iter().map(move |r| (r, self.0[r.index()]))
    }
}

impl PerResource<f64> {
    /// Sum across all resources.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl<T> Index<Resource> for PerResource<T> {
    type Output = T;

    fn index(&self, resource: Resource) -> &T {
        &self.0[resource.index()]
    }
}

impl<T> IndexMut<Resource> for PerResource<T> {
    fn index_mut(&mut self, resource: Resource) -> &mut T {
        &mut self.0[resource.index()]
    }
}
