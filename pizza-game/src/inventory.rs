//! Ingredient stock ledger: credited by orders, debited by served pizzas.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economy::EconomyModel;
use crate::ingredient::{Ingredient, IngredientCounts};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("order costs {needed} but only {available} is available")]
    InsufficientCash { needed: Money, available: Money },
    #[error("out of {ingredient}: need {needed}, have {available}")]
    OutOfStock {
        ingredient: Ingredient,
        needed: u32,
        available: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryLedger {
    stock: IngredientCounts,
}

impl InventoryLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stock: IngredientCounts::new(),
        }
    }

    #[must_use]
    pub const fn with_stock(stock: IngredientCounts) -> Self {
        Self { stock }
    }

    #[must_use]
    pub const fn stock(&self) -> &IngredientCounts {
        &self.stock
    }

    #[must_use]
    pub const fn count(&self, ingredient: Ingredient) -> u32 {
        self.stock.get(ingredient)
    }

    #[must_use]
    pub const fn has_any(&self, ingredient: Ingredient) -> bool {
        self.stock.get(ingredient) > 0
    }

    /// Buy `quantities`, paying from `cash`. Returns the amount spent.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InsufficientCash` when the order costs more than
    /// `cash`; neither stock nor cash is touched in that case.
    pub fn order(
        &mut self,
        quantities: &IngredientCounts,
        cash: &mut Money,
        economy: &EconomyModel<'_>,
    ) -> Result<Money, InventoryError> {
        let total = economy.order_cost(quantities);
        if total > *cash {
            warn!("order rejected: total {total} exceeds cash {cash}");
            return Err(InventoryError::InsufficientCash {
                needed: total,
                available: *cash,
            });
        }
        self.stock.absorb(quantities);
        *cash -= total;
        debug!("ordered {quantities} for {total}");
        Ok(total)
    }

    /// Deduct `usage` from stock, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::OutOfStock` naming the first short ingredient;
    /// stock is unchanged in that case.
    pub fn consume(&mut self, usage: &IngredientCounts) -> Result<(), InventoryError> {
        if let Some(ingredient) = usage.first_shortfall(&self.stock) {
            return Err(InventoryError::OutOfStock {
                ingredient,
                needed: usage.get(ingredient),
                available: self.stock.get(ingredient),
            });
        }
        for (ingredient, qty) in usage.iter() {
            self.stock[ingredient] -= qty;
        }
        Ok(())
    }
}
