//! Catalog data structures.
//!
//! Pure data types describing buildings, technologies, missions and units.
//! All of them deserialize from the on-disk catalog format.
//!
//! **Note:** This module contains no IO. File loading is handled by
//! `castle_headless`.

mod building_data;
mod mission_data;
mod tech_data;
mod unit_data;

pub use building_data::{BuildingData, BuildingLevelData};
pub use mission_data::{MissionData, RewardRange, UnitRequirement};
pub use tech_data::{
    is_production_technology, TechData, PRODUCTION_BONUS_STEP, PRODUCTION_TECHNOLOGIES,
};
pub use unit_data::UnitData;
