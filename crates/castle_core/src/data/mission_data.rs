//! Tavern mission definitions.

use serde::{Deserialize, Serialize};

use crate::resources::{Costs, PerResource, Resource};
use crate::units::{Army, UnitKind};

/// Units a mission keeps busy while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRequirement {
    /// Unit kind.
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Number of units.
    pub count: u32,
}

/// Reward range for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRange {
    /// Rewarded resource.
    #[serde(rename = "type")]
    pub resource: Resource,
    /// Smallest possible reward.
    pub min: u32,
    /// Largest possible reward.
    pub max: u32,
}

impl RewardRange {
    /// Midpoint of the range; the scheduler never samples rewards.
    #[must_use]
    pub fn average(&self) -> f64 {
        f64::from(self.min + self.max) / 2.0
    }
}

/// A tavern mission.
///
/// # Example JSON
///
/// ```json
/// {
///     "name": "Hunting",
///     "tavern_level": 2,
///     "duration_minutes": 15,
///     "units_required": [{ "type": "spearman", "count": 15 }],
///     "rewards": [
///         { "type": "wood", "min": 10, "max": 20 },
///         { "type": "stone", "min": 10, "max": 20 },
///         { "type": "iron", "min": 10, "max": 20 }
///     ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionData {
    /// Mission name; unique within a catalog.
    pub name: String,

    /// Minimum tavern level.
    pub tavern_level: u32,

    /// Maximum tavern level, 0 for no limit.
    #[serde(default)]
    pub max_tavern_level: u32,

    /// Mission length.
    pub duration_minutes: u32,

    /// Units kept busy for the whole mission.
    #[serde(default)]
    pub units_required: Vec<UnitRequirement>,

    /// Resources consumed at start.
    #[serde(default)]
    pub resource_costs: Costs,

    /// Resources returned at completion.
    #[serde(default)]
    pub rewards: Vec<RewardRange>,
}

impl MissionData {
    /// Mission length in seconds.
    #[must_use]
    pub const fn duration_seconds(&self) -> u64 {
        self.duration_minutes as u64 * 60
    }

    /// Whether the mission can be started at a tavern level.
    #[must_use]
    pub const fn available_at(&self, tavern_level: u32) -> bool {
        tavern_level >= self.tavern_level
            && (self.max_tavern_level == 0 || tavern_level <= self.max_tavern_level)
    }

    /// Average reward summed over all resources.
    #[must_use]
    pub fn average_total_reward(&self) -> f64 {
        self.rewards.iter().map(RewardRange::average).sum()
    }

    /// Average reward per resource.
    #[must_use]
    pub fn average_rewards(&self) -> PerResource<f64> {
        let mut out = PerResource::splat(0.0);
        for reward in &self.rewards {
            out[reward.resource] += reward.average();
        }
        out
    }

    /// Average reward minus every cost, food included.
    #[must_use]
    pub fn net_average_reward(&self) -> f64 {
        let costs = &self.resource_costs;
        self.average_total_reward() - costs.total_resources() as f64 - f64::from(costs.food)
    }

    /// Net reward per hour of mission time; the mission ROI.
    #[must_use]
    pub fn net_reward_per_hour(&self) -> f64 {
        if self.duration_minutes == 0 {
            return 0.0;
        }
        self.net_average_reward() / (f64::from(self.duration_minutes) / 60.0)
    }

    /// Total number of units the mission needs.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.units_required.iter().map(|req| req.count).sum()
    }

    /// Whether a roster can cover every unit requirement.
    #[must_use]
    pub fn staffed_by(&self, army: &Army) -> bool {
        self.units_required
            .iter()
            .all(|req| army.has(req.kind, req.count))
    }

    /// Units needed as a roster.
    #[must_use]
    pub fn required_army(&self) -> Army {
        let mut army = Army::EMPTY;
        for req in &self.units_required {
            army.add(req.kind, req.count);
        }
        army
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hire_stone_cutters() -> MissionData {
        MissionData {
            name: "Hire Stone Cutters".to_string(),
            tavern_level: 4,
            max_tavern_level: 0,
            duration_minutes: 360,
            units_required: vec![UnitRequirement {
                kind: UnitKind::Spearman,
                count: 30,
            }],
            resource_costs: Costs::new(75, 75, 0, 0),
            rewards: vec![RewardRange {
                resource: Resource::Stone,
                min: 396,
                max: 600,
            }],
        }
    }

    #[test]
    fn test_reward_arithmetic() {
        let mission = hire_stone_cutters();
        assert!((mission.average_total_reward() - 498.0).abs() < 1e-9);
        assert!((mission.net_average_reward() - 348.0).abs() < 1e-9);
        assert!((mission.net_reward_per_hour() - 58.0).abs() < 1e-9);
        assert_eq!(mission.average_rewards()[Resource::Stone], 498.0);
        assert_eq!(mission.duration_seconds(), 21_600);
    }

    #[test]
    fn test_tavern_window() {
        let mut mission = hire_stone_cutters();
        assert!(!mission.available_at(3));
        assert!(mission.available_at(4));
        assert!(mission.available_at(10));

        mission.max_tavern_level = 6;
        assert!(mission.available_at(6));
        assert!(!mission.available_at(7));
    }

    #[test]
    fn test_staffing() {
        let mission = hire_stone_cutters();
        let mut army = Army::EMPTY;
        army.add(UnitKind::Spearman, 29);
        assert!(!mission.staffed_by(&army));
        army.add(UnitKind::Spearman, 1);
        assert!(mission.staffed_by(&army));
        assert_eq!(mission.total_units(), 30);
        assert_eq!(mission.required_army().get(UnitKind::Spearman), 30);
    }

    #[test]
    fn test_zero_duration_has_no_roi() {
        let mut mission = hire_stone_cutters();
        mission.duration_minutes = 0;
        assert_eq!(mission.net_reward_per_hour(), 0.0);
    }

    #[test]
    fn test_parse_on_disk_format() {
        let json = r#"{
            "name": "Overtime Wood",
            "tavern_level": 1,
            "duration_minutes": 5,
            "units_required": [{"type": "spearman", "count": 5}],
            "resource_costs": {"wood": 0},
            "rewards": [{"type": "wood", "min": 5, "max": 10}]
        }"#;
        let mission: MissionData = serde_json::from_str(json).unwrap();
        assert_eq!(mission.units_required[0].kind, UnitKind::Spearman);
        assert_eq!(mission.max_tavern_level, 0);
        assert!((mission.net_reward_per_hour() - 90.0).abs() < 1e-9);
    }
}
