//! Pure pricing functions: ingredient costs and the price-to-demand curve.
use serde::{Deserialize, Serialize};

use crate::config::ParlourConfig;
use crate::constants::{DEMAND_STEADY_RATIO, DISCOUNT_BONUS_FACTOR};
use crate::ingredient::{Ingredient, IngredientCounts};
use crate::money::Money;
use crate::numbers::round_f64_to_u32;

/// Price-screen indicator derived from expected demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandMood {
    /// More customers than the reference price would draw.
    Eager,
    Steady,
    Reluctant,
}

/// Stateless view over the economic parameters of a config.
#[derive(Debug, Clone, Copy)]
pub struct EconomyModel<'a> {
    cfg: &'a ParlourConfig,
}

impl<'a> EconomyModel<'a> {
    #[must_use]
    pub const fn new(cfg: &'a ParlourConfig) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub const fn unit_cost(&self, ingredient: Ingredient) -> Money {
        self.cfg.unit_costs.get(ingredient)
    }

    /// Total price of an ingredient order.
    #[must_use]
    pub fn order_cost(&self, quantities: &IngredientCounts) -> Money {
        Ingredient::ALL
            .into_iter()
            .map(|ingredient| self.unit_cost(ingredient).times(quantities.get(ingredient)))
            .sum()
    }

    /// Expected customers for a day at `price`.
    ///
    /// Above the reference price demand falls linearly with elasticity; below
    /// it a discount bonus is added on top of the base demand.
    #[must_use]
    pub fn demand(&self, price: Money) -> u32 {
        let demand_cfg = &self.cfg.demand;
        let base = f64::from(demand_cfg.base);
        let elasticity = demand_cfg.elasticity;
        let price = price.as_dollars();
        let price_ref = demand_cfg.price_ref.as_dollars();

        let markup = (price - price_ref).max(0.0);
        let mut demand = round_f64_to_u32(base * (1.0 - elasticity * markup));
        if price < price_ref {
            let bonus = (price_ref - price) * elasticity * DISCOUNT_BONUS_FACTOR * base;
            demand = demand.saturating_add(round_f64_to_u32(bonus));
        }
        demand
    }

    #[must_use]
    pub fn demand_mood(&self, demand: u32) -> DemandMood {
        let base = self.cfg.demand.base;
        if demand > base {
            DemandMood::Eager
        } else if f64::from(demand) > f64::from(base) * DEMAND_STEADY_RATIO {
            DemandMood::Steady
        } else {
            DemandMood::Reluctant
        }
    }

    /// Clamp a requested price into the allowed band.
    #[must_use]
    pub fn clamp_price(&self, price: Money) -> Money {
        price.clamp(self.cfg.price_min, self.cfg.price_max)
    }

    /// Cost of the ingredients actually consumed during service.
    #[must_use]
    pub fn usage_cost(&self, usage: &IngredientCounts) -> Money {
        self.order_cost(usage)
    }

    #[must_use]
    pub const fn fixed_cost(&self) -> Money {
        self.cfg.fixed_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(value: f64) -> Money {
        Money::from_dollars_f64(value)
    }

    #[test]
    fn reference_price_yields_base_demand() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        assert_eq!(economy.demand(dollars(8.0)), 30);
    }

    #[test]
    fn price_band_edges_match_the_curve() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        assert_eq!(economy.demand(dollars(12.0)), 20);
        assert_eq!(economy.demand(dollars(4.0)), 35);
    }

    #[test]
    fn demand_never_increases_above_reference() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        let mut previous = economy.demand(dollars(8.0));
        for cents in (800..=2_400).step_by(10) {
            let current = economy.demand(Money::from_cents(cents));
            assert!(current <= previous, "demand rose at {cents} cents");
            previous = current;
        }
    }

    #[test]
    fn extreme_markup_floors_at_zero() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        assert_eq!(economy.demand(dollars(40.0)), 0);
    }

    #[test]
    fn order_cost_sums_unit_prices() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        let order = IngredientCounts::from_pairs(&[
            (Ingredient::Dough, 10),
            (Ingredient::Sauce, 10),
            (Ingredient::Cheese, 10),
            (Ingredient::Pepperoni, 5),
        ]);
        // 10 + 5 + 8 + 2
        assert_eq!(economy.order_cost(&order), Money::from_dollars(25));
        assert_eq!(economy.order_cost(&IngredientCounts::new()), Money::ZERO);
    }

    #[test]
    fn mood_tracks_demand_bands() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        assert_eq!(economy.demand_mood(35), DemandMood::Eager);
        assert_eq!(economy.demand_mood(30), DemandMood::Steady);
        assert_eq!(economy.demand_mood(19), DemandMood::Steady);
        assert_eq!(economy.demand_mood(18), DemandMood::Reluctant);
    }

    #[test]
    fn clamp_price_respects_band() {
        let cfg = ParlourConfig::default();
        let economy = EconomyModel::new(&cfg);
        assert_eq!(economy.clamp_price(dollars(2.0)), dollars(4.0));
        assert_eq!(economy.clamp_price(dollars(15.0)), dollars(12.0));
        assert_eq!(economy.clamp_price(dollars(9.5)), dollars(9.5));
    }
}
