//! Continuous resource accumulation.
//!
//! Resources grow linearly between events at `rate × bonus` per hour and are
//! clamped to `[0, cap]` after every change. All arithmetic is plain `f64`
//! applied in a fixed order, so identical inputs give identical stock.

use serde::{Deserialize, Serialize};

use crate::resources::{Costs, PerResource, Resource};

/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// How long until a cost becomes affordable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Affordable now.
    Ready,
    /// Affordable after this many seconds of production.
    After(u64),
    /// Never affordable with the current rates and caps.
    Never,
}

/// Stock, production rates and storage caps of the produced resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stockpile {
    /// Current amount of each resource.
    pub stock: PerResource<f64>,
    /// Base production per hour.
    pub rates: PerResource<f64>,
    /// Storage cap; `None` means uncapped.
    pub caps: PerResource<Option<u32>>,
    /// Production multiplier, starting at 1.0.
    pub bonus: f64,
}

impl Stockpile {
    /// A stockpile with the given stock, no production and no caps.
    #[must_use]
    pub fn new(stock: PerResource<f64>) -> Self {
        Self {
            stock,
            rates: PerResource::splat(0.0),
            caps: PerResource::splat(None),
            bonus: 1.0,
        }
    }

    /// Production per hour including the bonus.
    #[must_use]
    pub fn effective_rate(&self, resource: Resource) -> f64 {
        self.rates[resource] * self.bonus
    }

    /// Sum of base production rates.
    #[must_use]
    pub fn total_rate(&self) -> f64 {
        self.rates.total()
    }

    /// Accumulate `seconds` of production.
    pub fn advance(&mut self, seconds: u64) {
        if seconds == 0 {
            return;
        }
        let hours = seconds as f64 / SECONDS_PER_HOUR;
        for resource in Resource::ALL {
            let rate = self.rates[resource];
            if rate <= 0.0 {
                continue;
            }
            self.stock[resource] += rate * hours * self.bonus;
        }
        self.clamp_to_caps();
    }

    /// Whether the produced-resource part of a cost is covered.
    #[must_use]
    pub fn can_afford(&self, costs: &Costs) -> bool {
        Resource::ALL.into_iter().all(|resource| {
            let cost = costs.get(resource);
            cost == 0 || self.stock[resource] >= f64::from(cost)
        })
    }

    /// Time until a cost is affordable at current rates.
    ///
    /// A shortfall in a resource with no production, or a cost above the
    /// resource's cap, can never be covered without some other event.
    #[must_use]
    pub fn wait_for(&self, costs: &Costs) -> Wait {
        let mut longest = 0_u64;
        for resource in Resource::ALL {
            let cost = costs.get(resource);
            if cost == 0 {
                continue;
            }
            let available = self.stock[resource];
            let needed = f64::from(cost);
            if available >= needed {
                continue;
            }
            if self.caps[resource].is_some_and(|cap| cost > cap) {
                return Wait::Never;
            }
            let rate = self.effective_rate(resource);
            if rate <= 0.0 {
                return Wait::Never;
            }
            let seconds = ((needed - available) / rate * SECONDS_PER_HOUR).floor() as u64 + 1;
            longest = longest.max(seconds);
        }
        if longest == 0 {
            Wait::Ready
        } else {
            Wait::After(longest)
        }
    }

    /// The first resource (wood, stone, iron) whose cost exceeds its cap.
    #[must_use]
    pub fn exceeds_cap(&self, costs: &Costs) -> Option<Resource> {
        Resource::ALL
            .into_iter()
            .find(|&resource| self.caps[resource].is_some_and(|cap| costs.get(resource) > cap))
    }

    /// Deduct a cost. Stock never drops below zero.
    pub fn spend(&mut self, costs: &Costs) {
        for resource in Resource::ALL {
            self.stock[resource] -= f64::from(costs.get(resource));
        }
        self.clamp_to_caps();
    }

    /// Add an amount of one resource, clamped to its cap.
    pub fn credit(&mut self, resource: Resource, amount: f64) {
        self.stock[resource] += amount;
        self.clamp_to_caps();
    }

    /// Clamp every resource into `[0, cap]`.
    pub fn clamp_to_caps(&mut self) {
        for resource in Resource::ALL {
            let value = &mut self.stock[resource];
            if *value < 0.0 {
                *value = 0.0;
            }
            if let Some(cap) = self.caps[resource] {
                let cap = f64::from(cap);
                if *value > cap {
                    *value = cap;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pile() -> Stockpile {
        let mut pile = Stockpile::new(PerResource([100.0, 50.0, 0.0]));
        pile.rates = PerResource([3600.0, 450.0, 0.0]);
        pile.caps = PerResource([Some(5000), Some(5000), None]);
        pile
    }

    #[test]
    fn test_advance_accumulates_and_caps() {
        let mut pile = pile();
        pile.advance(60);
        assert!((pile.stock[Resource::Wood] - 160.0).abs() < 1e-9);
        assert!((pile.stock[Resource::Stone] - 57.5).abs() < 1e-9);
        assert_eq!(pile.stock[Resource::Iron], 0.0);

        pile.advance(7200);
        assert_eq!(pile.stock[Resource::Wood], 5000.0);
    }

    #[test]
    fn test_bonus_scales_production() {
        let mut pile = pile();
        pile.bonus = 1.1;
        pile.advance(10);
        assert!((pile.stock[Resource::Wood] - 111.0).abs() < 1e-9);
    }

    #[test]
    fn test_wait_for() {
        let pile = pile();
        assert_eq!(pile.wait_for(&Costs::new(100, 50, 0, 5)), Wait::Ready);
        // Half an hour of wood production: floor(1800) + 1.
        assert_eq!(pile.wait_for(&Costs::new(1900, 0, 0, 0)), Wait::After(1801));
        // The longest shortfall wins: one hour of stone.
        assert_eq!(pile.wait_for(&Costs::new(1900, 500, 0, 0)), Wait::After(3601));
        assert_eq!(pile.wait_for(&Costs::new(0, 0, 1, 0)), Wait::Never);
        assert_eq!(pile.wait_for(&Costs::new(5001, 0, 0, 0)), Wait::Never);
    }

    #[test]
    fn test_spend_and_credit() {
        let mut pile = pile();
        assert!(pile.can_afford(&Costs::new(100, 50, 0, 0)));
        assert!(!pile.can_afford(&Costs::new(100, 51, 0, 0)));
        pile.spend(&Costs::new(100, 60, 0, 0));
        assert_eq!(pile.stock[Resource::Wood], 0.0);
        assert_eq!(pile.stock[Resource::Stone], 0.0);

        pile.credit(Resource::Wood, 9000.0);
        assert_eq!(pile.stock[Resource::Wood], 5000.0);
        pile.credit(Resource::Iron, 9000.0);
        assert_eq!(pile.stock[Resource::Iron], 9000.0);
    }

    #[test]
    fn test_exceeds_cap_order() {
        let pile = pile();
        assert_eq!(pile.exceeds_cap(&Costs::new(10, 6000, 0, 0)), Some(Resource::Stone));
        assert_eq!(pile.exceeds_cap(&Costs::new(6000, 6000, 0, 0)), Some(Resource::Wood));
        assert_eq!(pile.exceeds_cap(&Costs::new(10, 10, 99_999, 0)), None);
    }
}
