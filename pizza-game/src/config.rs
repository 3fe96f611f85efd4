//! Tunable parameters for the parlour simulation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CHEESE_COST_CENTS, DAY_LENGTH_SECS, DEMAND_BASE, DEMAND_ELASTICITY, DOUGH_COST_CENTS,
    FIXED_COST_CENTS, HISTORY_WINDOW, PATIENCE_TIMEOUT_SECS, PATIENCE_WARN_SECS, PRICE_MAX_CENTS,
    PRICE_MIN_CENTS, PRICE_REF_CENTS, QUEUE_CAP, SAUCE_COST_CENTS, STARTING_CASH_CENTS,
    STARTING_PRICE_CENTS, TOPPING_COST_CENTS,
};
use crate::ingredient::Ingredient;
use crate::money::Money;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("price bounds invalid (min {min} > max {max})")]
    PriceBounds { min: Money, max: Money },
    #[error("patience thresholds invalid (warn {warn}s must be below timeout {timeout}s)")]
    PatienceOrder { warn: f64, timeout: f64 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-ingredient unit prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCosts {
    #[serde(default = "UnitCosts::default_dough")]
    pub dough: Money,
    #[serde(default = "UnitCosts::default_sauce")]
    pub sauce: Money,
    #[serde(default = "UnitCosts::default_cheese")]
    pub cheese: Money,
    #[serde(default = "UnitCosts::default_topping")]
    pub pepperoni: Money,
    #[serde(default = "UnitCosts::default_topping")]
    pub mushrooms: Money,
    #[serde(default = "UnitCosts::default_topping")]
    pub peppers: Money,
}

impl UnitCosts {
    const fn default_dough() -> Money {
        Money::from_cents(DOUGH_COST_CENTS)
    }

    const fn default_sauce() -> Money {
        Money::from_cents(SAUCE_COST_CENTS)
    }

    const fn default_cheese() -> Money {
        Money::from_cents(CHEESE_COST_CENTS)
    }

    const fn default_topping() -> Money {
        Money::from_cents(TOPPING_COST_CENTS)
    }

    #[must_use]
    pub const fn get(&self, ingredient: Ingredient) -> Money {
        match ingredient {
            Ingredient::Dough => self.dough,
            Ingredient::Sauce => self.sauce,
            Ingredient::Cheese => self.cheese,
            Ingredient::Pepperoni => self.pepperoni,
            Ingredient::Mushrooms => self.mushrooms,
            Ingredient::Peppers => self.peppers,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for ingredient in Ingredient::ALL {
            let cost = self.get(ingredient);
            if cost.is_negative() {
                return Err(ConfigError::MinViolation {
                    field: "unit_costs",
                    min: 0.0,
                    value: cost.as_dollars(),
                });
            }
        }
        Ok(())
    }
}

impl Default for UnitCosts {
    fn default() -> Self {
        Self {
            dough: Self::default_dough(),
            sauce: Self::default_sauce(),
            cheese: Self::default_cheese(),
            pepperoni: Self::default_topping(),
            mushrooms: Self::default_topping(),
            peppers: Self::default_topping(),
        }
    }
}

/// Price-to-demand curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandConfig {
    #[serde(default = "DemandConfig::default_base")]
    pub base: u32,
    #[serde(default = "DemandConfig::default_elasticity")]
    pub elasticity: f64,
    #[serde(default = "DemandConfig::default_price_ref")]
    pub price_ref: Money,
}

impl DemandConfig {
    const fn default_base() -> u32 {
        DEMAND_BASE
    }

    const fn default_elasticity() -> f64 {
        DEMAND_ELASTICITY
    }

    const fn default_price_ref() -> Money {
        Money::from_cents(PRICE_REF_CENTS)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.elasticity) {
            return Err(ConfigError::RangeViolation {
                field: "demand.elasticity",
                min: 0.0,
                max: 1.0,
                value: self.elasticity,
            });
        }
        if self.price_ref.cents() <= 0 {
            return Err(ConfigError::MinViolation {
                field: "demand.price_ref",
                min: 0.01,
                value: self.price_ref.as_dollars(),
            });
        }
        Ok(())
    }
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            base: Self::default_base(),
            elasticity: Self::default_elasticity(),
            price_ref: Self::default_price_ref(),
        }
    }
}

/// Customer queue and patience parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "ServiceConfig::default_day_length")]
    pub day_length_secs: u32,
    #[serde(default = "ServiceConfig::default_queue_cap")]
    pub queue_cap: usize,
    #[serde(default = "ServiceConfig::default_patience_warn")]
    pub patience_warn_secs: f64,
    #[serde(default = "ServiceConfig::default_patience_timeout")]
    pub patience_timeout_secs: f64,
}

impl ServiceConfig {
    const fn default_day_length() -> u32 {
        DAY_LENGTH_SECS
    }

    const fn default_queue_cap() -> usize {
        QUEUE_CAP
    }

    const fn default_patience_warn() -> f64 {
        PATIENCE_WARN_SECS
    }

    const fn default_patience_timeout() -> f64 {
        PATIENCE_TIMEOUT_SECS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3_600).contains(&self.day_length_secs) {
            return Err(ConfigError::RangeViolation {
                field: "service.day_length_secs",
                min: 1.0,
                max: 3_600.0,
                value: f64::from(self.day_length_secs),
            });
        }
        if self.queue_cap == 0 {
            return Err(ConfigError::MinViolation {
                field: "service.queue_cap",
                min: 1.0,
                value: 0.0,
            });
        }
        if self.patience_warn_secs < 0.0 || self.patience_warn_secs >= self.patience_timeout_secs
        {
            return Err(ConfigError::PatienceOrder {
                warn: self.patience_warn_secs,
                timeout: self.patience_timeout_secs,
            });
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            day_length_secs: Self::default_day_length(),
            queue_cap: Self::default_queue_cap(),
            patience_warn_secs: Self::default_patience_warn(),
            patience_timeout_secs: Self::default_patience_timeout(),
        }
    }
}

/// Complete parlour configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlourConfig {
    #[serde(default = "ParlourConfig::default_fixed_cost")]
    pub fixed_cost: Money,
    #[serde(default = "ParlourConfig::default_starting_cash")]
    pub starting_cash: Money,
    #[serde(default = "ParlourConfig::default_starting_price")]
    pub starting_price: Money,
    #[serde(default = "ParlourConfig::default_price_min")]
    pub price_min: Money,
    #[serde(default = "ParlourConfig::default_price_max")]
    pub price_max: Money,
    #[serde(default = "ParlourConfig::default_history_window")]
    pub history_window: usize,
    #[serde(default)]
    pub unit_costs: UnitCosts,
    #[serde(default)]
    pub demand: DemandConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl ParlourConfig {
    const fn default_fixed_cost() -> Money {
        Money::from_cents(FIXED_COST_CENTS)
    }

    const fn default_starting_cash() -> Money {
        Money::from_cents(STARTING_CASH_CENTS)
    }

    const fn default_starting_price() -> Money {
        Money::from_cents(STARTING_PRICE_CENTS)
    }

    const fn default_price_min() -> Money {
        Money::from_cents(PRICE_MIN_CENTS)
    }

    const fn default_price_max() -> Money {
        Money::from_cents(PRICE_MAX_CENTS)
    }

    const fn default_history_window() -> usize {
        HISTORY_WINDOW
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the JSON is malformed or any field is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_cost.is_negative() {
            return Err(ConfigError::MinViolation {
                field: "fixed_cost",
                min: 0.0,
                value: self.fixed_cost.as_dollars(),
            });
        }
        if self.price_min.cents() <= 0 || self.price_min > self.price_max {
            return Err(ConfigError::PriceBounds {
                min: self.price_min,
                max: self.price_max,
            });
        }
        if self.history_window == 0 {
            return Err(ConfigError::MinViolation {
                field: "history_window",
                min: 1.0,
                value: 0.0,
            });
        }
        self.unit_costs.validate()?;
        self.demand.validate()?;
        self.service.validate()?;
        Ok(())
    }
}

impl Default for ParlourConfig {
    fn default() -> Self {
        Self {
            fixed_cost: Self::default_fixed_cost(),
            starting_cash: Self::default_starting_cash(),
            starting_price: Self::default_starting_price(),
            price_min: Self::default_price_min(),
            price_max: Self::default_price_max(),
            history_window: Self::default_history_window(),
            unit_costs: UnitCosts::default(),
            demand: DemandConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_shipped_balance() {
        let cfg = ParlourConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.fixed_cost, Money::from_dollars(20));
        assert_eq!(cfg.starting_cash, Money::from_dollars(100));
        assert_eq!(cfg.unit_costs.get(Ingredient::Cheese), Money::from_cents(80));
        assert_eq!(cfg.service.day_length_secs, 120);
        assert_eq!(cfg.service.queue_cap, 5);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = ParlourConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ParlourConfig::default());
    }

    #[test]
    fn shipped_asset_matches_defaults() {
        let cfg = ParlourConfig::from_json(include_str!("../assets/parlour.json")).unwrap();
        assert_eq!(cfg, ParlourConfig::default());
    }

    #[test]
    fn partial_json_overrides_single_fields() {
        let cfg =
            ParlourConfig::from_json(r#"{"service":{"day_length_secs":30},"fixed_cost":500}"#)
                .unwrap();
        assert_eq!(cfg.service.day_length_secs, 30);
        assert_eq!(cfg.service.queue_cap, 5);
        assert_eq!(cfg.fixed_cost, Money::from_cents(500));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let err = ParlourConfig::from_json(r#"{"demand":{"elasticity":1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::RangeViolation { field: "demand.elasticity", .. }));

        let err = ParlourConfig::from_json(r#"{"price_min":900,"price_max":500}"#).unwrap_err();
        assert!(matches!(err, ConfigError::PriceBounds { .. }));

        let err = ParlourConfig::from_json(
            r#"{"service":{"patience_warn_secs":12.0,"patience_timeout_secs":10.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::PatienceOrder { .. }));

        let err = ParlourConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
